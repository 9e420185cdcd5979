//! Base-36 integer text (`0-9a-z`, optional leading `-`).

use crate::error::{TokenError, TokenResult};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Formats `value` in lowercase base 36.
#[must_use]
pub fn encode_base36(value: i64) -> String {
    let mut magnitude = value.unsigned_abs();
    if magnitude == 0 {
        return "0".to_string();
    }

    // u64::MAX needs 13 base-36 digits.
    let mut buf = [0u8; 14];
    let mut pos = buf.len();
    while magnitude > 0 {
        pos -= 1;
        buf[pos] = DIGITS[(magnitude % 36) as usize];
        magnitude /= 36;
    }
    if value < 0 {
        pos -= 1;
        buf[pos] = b'-';
    }
    buf[pos..].iter().map(|&b| char::from(b)).collect()
}

/// Parses lowercase base-36 text produced by [`encode_base36`].
pub fn decode_base36(text: &str) -> TokenResult<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if digits.is_empty() {
        return Err(TokenError::InvalidInteger {
            text: text.to_string(),
        });
    }

    let mut magnitude: u64 = 0;
    for c in digits.chars() {
        let digit = match c {
            '0'..='9' => c as u64 - '0' as u64,
            'a'..='z' => c as u64 - 'a' as u64 + 10,
            _ => {
                return Err(TokenError::InvalidInteger {
                    text: text.to_string(),
                })
            }
        };
        magnitude = magnitude
            .checked_mul(36)
            .and_then(|m| m.checked_add(digit))
            .ok_or_else(|| TokenError::IntegerOverflow {
                text: text.to_string(),
            })?;
    }

    let overflow = || TokenError::IntegerOverflow {
        text: text.to_string(),
    };
    if negative {
        if magnitude == i64::MIN.unsigned_abs() {
            return Ok(i64::MIN);
        }
        i64::try_from(magnitude).map(|m| -m).map_err(|_| overflow())
    } else {
        i64::try_from(magnitude).map_err(|_| overflow())
    }
}

//! Field-block reader with bounded, panic-free scanning.

use crate::error::{TokenError, TokenResult};
use crate::escape::{is_reserved, ESCAPE, FIELD_DELIMITER, ITEM_DELIMITER};

/// One field block split out of an encoded string, already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// The compact identifier (first token of the block).
    pub id: String,
    /// The value tokens, in order.
    pub tokens: Vec<String>,
    /// Byte offset of the block in the input.
    pub offset: usize,
}

/// Iterates over the field blocks of an encoded string.
///
/// An escape character followed by a reserved character is never treated as
/// a delimiter. Escapes are consumed left to right, so `zzq` is a literal `z`
/// followed by an item delimiter. After the first error the reader is exhausted.
#[derive(Debug)]
pub struct BlockReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> BlockReader<'a> {
    /// Creates a new `BlockReader` over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` if there is nothing left to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn read_block(&mut self) -> TokenResult<RawBlock> {
        let start = self.pos;
        let rest = &self.input[start..];
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = rest.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            match c {
                ESCAPE => match chars.peek() {
                    Some(&(_, next)) if is_reserved(next) => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push(c),
                },
                ITEM_DELIMITER => parts.push(std::mem::take(&mut current)),
                FIELD_DELIMITER => {
                    parts.push(current);
                    self.pos = start + idx + c.len_utf8();
                    let mut parts = parts.into_iter();
                    let id = parts.next().unwrap_or_default();
                    return Ok(RawBlock {
                        id,
                        tokens: parts.collect(),
                        offset: start,
                    });
                }
                _ => current.push(c),
            }
        }

        self.pos = self.input.len();
        Err(TokenError::UnterminatedBlock { offset: start })
    }
}

impl Iterator for BlockReader<'_> {
    type Item = TokenResult<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }
        Some(self.read_block())
    }
}

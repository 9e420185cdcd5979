//! Reversible escaping over the reserved alphabet.

use std::borrow::Cow;

/// Separates tokens inside a field block.
pub const ITEM_DELIMITER: char = 'q';

/// Closes a field block.
pub const FIELD_DELIMITER: char = 'j';

/// Prefixes a reserved character that must be read literally.
pub const ESCAPE: char = 'z';

/// Returns `true` if `c` is one of the three reserved characters.
#[must_use]
pub const fn is_reserved(c: char) -> bool {
    matches!(c, ITEM_DELIMITER | FIELD_DELIMITER | ESCAPE)
}

/// Escapes every reserved character in `text`.
///
/// Borrows when there is nothing to escape.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(is_reserved) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    escape_into(text, &mut out);
    Cow::Owned(out)
}

/// Appends the escaped form of `text` to `out`.
pub fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        if is_reserved(c) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

/// Reverses [`escape`].
///
/// An escape character that is not followed by a reserved character is kept
/// as-is.
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains(ESCAPE) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(&next) = chars.peek() {
                if is_reserved(next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_plain_text_borrows() {
        assert!(matches!(escape("hello"), Cow::Borrowed("hello")));
    }

    #[test]
    fn escape_reserved_characters() {
        assert_eq!(escape("q"), "zq");
        assert_eq!(escape("j"), "zj");
        assert_eq!(escape("z"), "zz");
        assert_eq!(escape("a q j z b"), "a zq zj zz b");
    }

    #[test]
    fn unescape_reverses_escape() {
        let text = "a q j z b";
        assert_eq!(unescape(&escape(text)), text);
    }

    #[test]
    fn unescape_consumes_pairs_left_to_right() {
        // "zz" is a literal z; the following "q" is then a plain q.
        assert_eq!(unescape("zzq"), "zq");
        assert_eq!(unescape("zzzq"), "zq");
    }

    #[test]
    fn unescape_keeps_lone_escape() {
        assert_eq!(unescape("za"), "za");
        assert_eq!(unescape("z"), "z");
    }

    #[test]
    fn double_escape_single_unescape() {
        let once = escape("jazz").into_owned();
        let twice = escape(&once).into_owned();
        assert_eq!(unescape(&twice), once);
    }

    #[test]
    fn escape_into_appends() {
        let mut out = String::from("0q");
        escape_into("zip", &mut out);
        assert_eq!(out, "0qzzip");
    }

    #[test]
    fn escape_non_ascii_passthrough() {
        assert_eq!(escape("héllo wörld"), "héllo wörld");
        assert_eq!(unescape(&escape("ąqę")), "ąqę");
    }
}

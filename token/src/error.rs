//! Error types for tokenization.

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Errors that can occur while reading encoded text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Input ended inside a field block (no closing field delimiter).
    #[error("unterminated field block starting at offset {offset}")]
    UnterminatedBlock {
        /// Byte offset where the unterminated block starts.
        offset: usize,
    },

    /// Text is not a base-36 integer.
    #[error("invalid base-36 integer {text:?}")]
    InvalidInteger { text: String },

    /// Base-36 integer does not fit in 64 bits.
    #[error("base-36 integer {text:?} overflows i64")]
    IntegerOverflow { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unterminated_block() {
        let err = TokenError::UnterminatedBlock { offset: 12 };
        let msg = err.to_string();
        assert!(msg.contains("12"), "should mention offset");
        assert!(msg.contains("unterminated"));
    }

    #[test]
    fn error_display_invalid_integer() {
        let err = TokenError::InvalidInteger {
            text: "1!".to_string(),
        };
        assert!(err.to_string().contains("\"1!\""));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<TokenError>();
    }
}

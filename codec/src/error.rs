//! Error types for codec operations.

use std::fmt;

use schema::FieldError;
use token::TokenError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while accessing, encoding or decoding state.
///
/// Three groups matter to callers:
/// - schema misuse ([`UnknownField`](Self::UnknownField),
///   [`TypeMismatch`](Self::TypeMismatch)) is a defect in the calling code;
/// - validation ([`InvalidValue`](Self::InvalidValue)) rejects a mutation
///   before anything changes;
/// - decode errors (see [`is_decode_error`](Self::is_decode_error)) mean the
///   string is stale, tampered with or from another schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Field name is not declared in the schema.
    #[error("unknown field {name:?}")]
    UnknownField { name: String },

    /// Typed accessor used on a field of another variant.
    #[error("field {field:?} is a {found} field, not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Value rejected by the field's variant.
    #[error("invalid value for field {field:?}: {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: FieldError,
    },

    /// Encoded string could not be split into field blocks.
    #[error("malformed input: {0}")]
    Malformed(#[from] TokenError),

    /// Field block carries an identifier the schema does not assign.
    #[error("unknown field identifier {id:?} at offset {offset}")]
    UnknownFieldId { id: String, offset: usize },

    /// Field block tokens could not be decompressed.
    #[error("invalid encoding for field {field:?}: {source}")]
    InvalidField {
        field: String,
        #[source]
        source: FieldError,
    },

    /// Configured limit exceeded.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Custom id framing error.
    #[error("invalid custom id: {reason}")]
    InvalidCustomId { reason: CustomIdReason },
}

impl CodecError {
    /// Returns `true` for errors caused by the encoded input rather than by
    /// the calling code.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        match self {
            Self::Malformed(_)
            | Self::UnknownFieldId { .. }
            | Self::InvalidField { .. }
            | Self::LimitsExceeded { .. } => true,
            Self::InvalidCustomId { reason } => {
                matches!(reason, CustomIdReason::MissingSeparator)
            }
            Self::UnknownField { .. } | Self::TypeMismatch { .. } | Self::InvalidValue { .. } => {
                false
            }
        }
    }
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    InputLength,
    Blocks,
    CustomIdLength,
}

/// Details for invalid custom ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomIdReason {
    EmptyPrefix,
    PrefixContainsSeparator,
    MissingSeparator,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputLength => write!(f, "input length"),
            Self::Blocks => write!(f, "field block count"),
            Self::CustomIdLength => write!(f, "custom id length"),
        }
    }
}

impl fmt::Display for CustomIdReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrefix => write!(f, "prefix is empty"),
            Self::PrefixContainsSeparator => write!(f, "prefix contains the separator"),
            Self::MissingSeparator => write!(f, "no separator between prefix and state"),
        }
    }
}

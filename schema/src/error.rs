//! Schema construction and field validation errors.

use token::TokenError;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for field compress/decompress operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur when building or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Duplicate field name in a schema.
    #[error("duplicate field name {name:?}")]
    DuplicateField { name: String },

    /// Duplicate option name in a choice.
    #[error("duplicate choice option {option:?}")]
    DuplicateOption { option: String },

    /// A choice must offer at least one option.
    #[error("choice has no options")]
    EmptyChoice,

    /// A field default is not a valid value for its variant.
    #[error("invalid default for field {field:?}: {source}")]
    InvalidDefault {
        field: String,
        #[source]
        source: FieldError,
    },
}

/// Errors raised by a field variant while compressing or decompressing a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The value does not belong to the field's variant.
    #[error("expected {expected} value but got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Choice value names an option that is not listed.
    #[error("option {option:?} does not exist")]
    UnknownOption { option: String },

    /// Choice token is not the identifier of any option.
    #[error("no option has identifier {id:?}")]
    UnknownOptionId { id: String },

    /// Wrong number of value tokens for the variant.
    #[error("expected {expected} value token(s), found {found}")]
    TokenCount { expected: usize, found: usize },

    /// Boolean token other than the true marker or empty.
    #[error("invalid boolean token {token:?}")]
    InvalidBoolean { token: String },

    /// Timestamp cannot be represented as whole seconds from the epoch.
    #[error("timestamp out of range")]
    TimestampOutOfRange,

    /// Timestamp default carries a fraction of a second.
    #[error("timestamp default must be whole seconds")]
    FractionalTimestamp,

    /// Token text could not be parsed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

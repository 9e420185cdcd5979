//! Field variants, compact identifier tables and schemas for the cidpack codec.
//!
//! This crate defines how interaction state is described before it is packed:
//! - Field variants (string, int, boolean, list, choice, timestamp) and their
//!   token encodings
//! - Compact base-36 identifiers for field and option names
//! - Typed choice enums for continuation-style handler selection
//! - Deterministic schema fingerprinting
//!
//! # Design Principles
//!
//! - **Runtime schemas** - Schemas are built from literal, order-stable declarations.
//! - **Order is the contract** - Identifiers come from declaration order, never
//!   from hashing or map iteration.
//! - **Validation up front** - Invalid values are rejected by `compress`, before
//!   any state is changed.

mod choice;
#[cfg(feature = "serde")]
mod decl;
mod error;
mod field;
mod hash;
mod keys;
mod schema;

pub use choice::{ChoiceEnum, ChoiceOptions};
#[cfg(feature = "serde")]
pub use decl::{FieldDecl, FieldKindDecl, SchemaDecl};
pub use error::{FieldError, FieldResult, SchemaError, SchemaResult};
pub use field::{
    from_unix_seconds, unix_seconds, FieldDef, FieldKind, FieldValue, TIMESTAMP_EPOCH_SECS,
    TRUE_TOKEN,
};
pub use hash::schema_fingerprint;
pub use keys::KeyTable;
pub use schema::{Schema, SchemaBuilder};

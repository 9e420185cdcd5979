//! Encoding and decoding of interaction state for the cidpack codec.
//!
//! This is the main codec crate. It ties together token and schema to pack
//! typed field values into the short strings carried by component custom ids.
//!
//! # Features
//!
//! - Typed state container with defaults, chained saves and cheap derivation
//! - Encoding in insertion order, decoding with configurable limits
//! - Typed choice dispatch through [`ChoiceEnum`]
//! - Custom-id framing under the platform length ceiling
//!
//! # Design Principles
//!
//! - **All or nothing** - A string that fails to decode yields no state at all.
//! - **Validate before mutating** - A rejected save leaves the container as it was.
//! - **Deterministic** - Same schema and values produce the same string.

mod custom_id;
mod error;
mod limits;
mod state;

pub use custom_id::{compose_custom_id, CustomId, CUSTOM_ID_SEPARATOR};
pub use error::{CodecError, CodecResult, CustomIdReason, LimitKind};
pub use limits::CodecLimits;
pub use schema::{ChoiceEnum, FieldDef, FieldValue, Schema};
pub use state::StateData;

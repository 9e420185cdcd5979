//! Escaping, base-36 text and field-block tokenization for the cidpack codec.
//!
//! This crate provides [`BlockWriter`] and [`BlockReader`] for assembling and
//! splitting the delimited text format that carries encoded state.
//!
//! # Design Principles
//!
//! - **Three reserved characters** - `q` separates items, `j` closes a field
//!   block, `z` escapes either of them (or itself).
//! - **No domain knowledge** - This crate knows nothing about fields, schemas
//!   or values. Blocks are an identifier plus a list of raw tokens.
//! - **Explicit errors** - Malformed input returns structured errors, never panics.
//!
//! # Example
//!
//! ```
//! use token::{BlockReader, BlockWriter};
//!
//! let mut writer = BlockWriter::new();
//! writer.write_block("0", ["quiz"]);
//! writer.write_block("1", ["a", "b"]);
//!
//! let encoded = writer.finish();
//! assert_eq!(encoded, "0qzquizzj1qaqbj");
//!
//! let blocks: Vec<_> = BlockReader::new(&encoded).collect::<Result<_, _>>().unwrap();
//! assert_eq!(blocks[0].id, "0");
//! assert_eq!(blocks[0].tokens, vec!["quiz".to_string()]);
//! assert_eq!(blocks[1].tokens.len(), 2);
//! ```

mod base36;
mod error;
mod escape;
mod reader;
mod writer;

pub use base36::{decode_base36, encode_base36};
pub use error::{TokenError, TokenResult};
pub use escape::{
    escape, escape_into, is_reserved, unescape, ESCAPE, FIELD_DELIMITER, ITEM_DELIMITER,
};
pub use reader::{BlockReader, RawBlock};
pub use writer::BlockWriter;

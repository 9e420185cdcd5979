//! Field-block writer.

use crate::escape::{escape_into, FIELD_DELIMITER, ITEM_DELIMITER};

/// Assembles escaped field blocks into a single string.
///
/// Each block is written as `<id>(q<token>)*j`, with the identifier and every
/// token escaped. A block with no tokens is `<id>j`.
#[derive(Debug, Default)]
pub struct BlockWriter {
    out: String,
    blocks: usize,
}

impl BlockWriter {
    /// Creates a new empty `BlockWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `BlockWriter` with pre-allocated capacity in bytes.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: String::with_capacity(bytes),
            blocks: 0,
        }
    }

    /// Returns the number of blocks written so far.
    #[must_use]
    pub const fn blocks_written(&self) -> usize {
        self.blocks
    }

    /// Returns the length of the output so far, in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Writes one field block.
    pub fn write_block<I, S>(&mut self, id: &str, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        escape_into(id, &mut self.out);
        for token in tokens {
            self.out.push(ITEM_DELIMITER);
            escape_into(token.as_ref(), &mut self.out);
        }
        self.out.push(FIELD_DELIMITER);
        self.blocks += 1;
    }

    /// Finishes writing and returns the encoded string.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

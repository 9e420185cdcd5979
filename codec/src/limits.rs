//! Limits for bounded decoding and custom-id framing.

/// Codec limits enforced while decoding and when framing custom ids.
///
/// Bare [`encode`](crate::StateData::encode) never checks these; keeping
/// output under the platform ceiling is the caller's schema choice, and
/// [`compose_custom_id`](crate::compose_custom_id) is where it is enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum encoded input length in bytes, checked before tokenizing.
    pub max_input_len: usize,
    /// Maximum number of field blocks in one encoded string.
    pub max_blocks: usize,
    /// Maximum custom id length in characters (prefix, separator and state).
    pub max_custom_id_len: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_input_len: 4096,
            max_blocks: 256,
            // Component custom ids are capped at 100 characters by the platform.
            max_custom_id_len: 100,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_input_len: 256,
            max_blocks: 16,
            max_custom_id_len: 100,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_input_len: usize::MAX,
            max_blocks: usize::MAX,
            max_custom_id_len: usize::MAX,
        }
    }
}

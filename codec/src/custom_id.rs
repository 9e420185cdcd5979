//! Custom-id framing: `<prefix>.<state>`.
//!
//! The prefix routes an interaction to its handler; the state is whatever
//! [`StateData::encode`] produced. The separator is outside the reserved
//! alphabet, so it may also appear inside the state.

use schema::Schema;

use crate::error::{CodecError, CodecResult, CustomIdReason, LimitKind};
use crate::limits::CodecLimits;
use crate::state::StateData;

/// Separator between the routing prefix and the encoded state.
pub const CUSTOM_ID_SEPARATOR: char = '.';

/// A custom id split into its routing prefix and encoded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomId<'a> {
    pub prefix: &'a str,
    pub payload: &'a str,
}

impl<'a> CustomId<'a> {
    /// Splits `text` on the first separator.
    pub fn parse(text: &'a str, limits: &CodecLimits) -> CodecResult<Self> {
        check_length(text, limits)?;
        let (prefix, payload) =
            text.split_once(CUSTOM_ID_SEPARATOR)
                .ok_or(CodecError::InvalidCustomId {
                    reason: CustomIdReason::MissingSeparator,
                })?;
        if prefix.is_empty() {
            return Err(CodecError::InvalidCustomId {
                reason: CustomIdReason::EmptyPrefix,
            });
        }
        Ok(Self { prefix, payload })
    }

    /// Decodes the payload against `schema`.
    pub fn decode<'s>(&self, schema: &'s Schema, limits: &CodecLimits) -> CodecResult<StateData<'s>> {
        StateData::decode_with_limits(schema, self.payload, limits)
    }
}

/// Frames `state` behind `prefix`, enforcing the custom id length limit.
pub fn compose_custom_id(
    prefix: &str,
    state: &StateData<'_>,
    limits: &CodecLimits,
) -> CodecResult<String> {
    if prefix.is_empty() {
        return Err(CodecError::InvalidCustomId {
            reason: CustomIdReason::EmptyPrefix,
        });
    }
    if prefix.contains(CUSTOM_ID_SEPARATOR) {
        return Err(CodecError::InvalidCustomId {
            reason: CustomIdReason::PrefixContainsSeparator,
        });
    }

    let encoded = state.encode()?;
    let mut id = String::with_capacity(prefix.len() + 1 + encoded.len());
    id.push_str(prefix);
    id.push(CUSTOM_ID_SEPARATOR);
    id.push_str(&encoded);
    check_length(&id, limits)?;
    Ok(id)
}

fn check_length(text: &str, limits: &CodecLimits) -> CodecResult<()> {
    let chars = text.chars().count();
    if chars > limits.max_custom_id_len {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::CustomIdLength,
            limit: limits.max_custom_id_len,
            actual: chars,
        });
    }
    Ok(())
}

impl StateData<'_> {
    /// Frames this state behind `prefix` with the default limits.
    pub fn to_custom_id(&self, prefix: &str) -> CodecResult<String> {
        compose_custom_id(prefix, self, &CodecLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use schema::FieldDef;

    use super::*;

    fn schema() -> Schema {
        Schema::builder()
            .field("note", FieldDef::string())
            .field("page", FieldDef::int())
            .build()
            .unwrap()
    }

    #[test]
    fn compose_and_parse() {
        let schema = schema();
        let mut state = StateData::new(&schema);
        state.save("note", "v1.2").unwrap().save("page", 2).unwrap();

        let id = state.to_custom_id("menu").unwrap();
        assert_eq!(id, "menu.0qv1.2j1q2j");

        let parsed = CustomId::parse(&id, &CodecLimits::default()).unwrap();
        assert_eq!(parsed.prefix, "menu");
        assert_eq!(parsed.payload, "0qv1.2j1q2j");
        let decoded = parsed.decode(&schema, &CodecLimits::default()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn empty_state_keeps_separator() {
        let schema = schema();
        let state = StateData::new(&schema);
        assert_eq!(state.to_custom_id("x").unwrap(), "x.");
        let parsed = CustomId::parse("x.", &CodecLimits::default()).unwrap();
        assert_eq!(parsed.payload, "");
    }

    #[test]
    fn prefix_is_validated() {
        let schema = schema();
        let state = StateData::new(&schema);
        assert_eq!(
            state.to_custom_id("").unwrap_err(),
            CodecError::InvalidCustomId {
                reason: CustomIdReason::EmptyPrefix
            }
        );
        assert_eq!(
            state.to_custom_id("a.b").unwrap_err(),
            CodecError::InvalidCustomId {
                reason: CustomIdReason::PrefixContainsSeparator
            }
        );
    }

    #[test]
    fn length_limit_counts_characters() {
        let schema = schema();
        let mut state = StateData::new(&schema);
        // 1 + 1 + "0q".len() + 96 + "j".len() = 101
        state.save("note", "é".repeat(96)).unwrap();
        let err = state.to_custom_id("p").unwrap_err();
        assert_eq!(
            err,
            CodecError::LimitsExceeded {
                kind: LimitKind::CustomIdLength,
                limit: 100,
                actual: 101,
            }
        );

        state.save("note", "é".repeat(95)).unwrap();
        assert_eq!(state.to_custom_id("p").unwrap().chars().count(), 100);
    }

    #[test]
    fn parse_rejects_missing_separator() {
        let err = CustomId::parse("noseparator", &CodecLimits::default()).unwrap_err();
        assert!(err.is_decode_error());
        assert!(CustomId::parse(".0qxj", &CodecLimits::default()).is_err());
    }
}

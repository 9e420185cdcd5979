//! Reference schema for a 1v1 challenge message.
//!
//! The message carries its whole state in the custom ids of its buttons. A
//! button press routes back here by prefix, the state is decoded against the
//! same schema and the `callback` choice selects which handler runs.

use std::time::{Duration, SystemTime};

use codec::{compose_custom_id, CodecLimits, CodecResult, CustomId, StateData};
use schema::{ChoiceEnum, FieldDef, Schema};

/// Custom id prefix routing interactions to the challenge message.
pub const CHALLENGE_PREFIX: &str = "c";

/// JSON declaration of [`challenge_schema`].
pub const CHALLENGE_SCHEMA_JSON: &str = include_str!("../schemas/challenge.json");

/// How long a challenge can be accepted after it is sent.
pub const CHALLENGE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Handler to run when a challenge button is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeCallback {
    OnAccept,
    OnDecline,
}

impl ChoiceEnum for ChallengeCallback {
    const VARIANTS: &'static [Self] = &[Self::OnAccept, Self::OnDecline];

    fn name(self) -> &'static str {
        match self {
            Self::OnAccept => "on_accept",
            Self::OnDecline => "on_decline",
        }
    }
}

/// Result of handling a button press on a challenge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome<'s> {
    /// The opponent accepted; the new state should be rendered.
    Accepted(StateData<'s>),
    /// The opponent declined.
    Declined,
    /// The challenge timed out before it was answered.
    Expired,
    /// Pressed by someone other than the opponent, or already answered.
    Ignored,
    /// Not a challenge custom id, or no callback in the state.
    Unhandled,
}

pub fn challenge_schema() -> Schema {
    Schema::builder()
        .field("time_sent", FieldDef::timestamp())
        .field("initiator_id", FieldDef::string())
        .field("opponent_id", FieldDef::string())
        .field("ranking_id", FieldDef::int())
        .field("best_of", FieldDef::int().with_default(1))
        .field("opponent_accepted", FieldDef::boolean().with_default(false))
        .field("ongoing_match_channel_id", FieldDef::string())
        .field(
            "callback",
            FieldDef::choice_enum::<ChallengeCallback>().expect("callback options must be valid"),
        )
        .build()
        .expect("challenge schema must be valid")
}

/// Creates the state of a freshly sent challenge.
pub fn new_challenge<'s>(
    schema: &'s Schema,
    initiator_id: &str,
    opponent_id: &str,
    ranking_id: i64,
    best_of: i64,
    time_sent: SystemTime,
) -> CodecResult<StateData<'s>> {
    let mut state = StateData::new(schema);
    state
        .save("time_sent", time_sent)?
        .save("initiator_id", initiator_id)?
        .save("opponent_id", opponent_id)?
        .save("ranking_id", ranking_id)?
        .save("best_of", best_of)?;
    Ok(state)
}

/// Custom id of the button that runs `callback`.
///
/// Sibling buttons share all state but the callback, so each one is derived
/// from the same base without touching it.
pub fn button_custom_id(state: &StateData<'_>, callback: ChallengeCallback) -> CodecResult<String> {
    let button = state.derive("callback", callback.value())?;
    compose_custom_id(CHALLENGE_PREFIX, &button, &CodecLimits::default())
}

/// Buttons to render for `state`: none once the challenge is accepted.
pub fn challenge_buttons(state: &StateData<'_>) -> CodecResult<Vec<(&'static str, String)>> {
    if state.flag("opponent_accepted")? {
        return Ok(Vec::new());
    }
    Ok(vec![
        ("Accept", button_custom_id(state, ChallengeCallback::OnAccept)?),
        ("Decline", button_custom_id(state, ChallengeCallback::OnDecline)?),
    ])
}

/// Routes a button press to its handler.
pub fn handle_component<'s>(
    schema: &'s Schema,
    custom_id: &str,
    user_id: &str,
    now: SystemTime,
) -> CodecResult<ChallengeOutcome<'s>> {
    let limits = CodecLimits::default();
    let id = CustomId::parse(custom_id, &limits)?;
    if id.prefix != CHALLENGE_PREFIX {
        return Ok(ChallengeOutcome::Unhandled);
    }
    let state = id.decode(schema, &limits)?;

    match state.get_choice_as::<ChallengeCallback>("callback")? {
        Some(ChallengeCallback::OnAccept) => on_accept(state, user_id, now),
        Some(ChallengeCallback::OnDecline) => on_decline(&state, user_id),
        None => Ok(ChallengeOutcome::Unhandled),
    }
}

fn on_accept<'s>(
    mut state: StateData<'s>,
    user_id: &str,
    now: SystemTime,
) -> CodecResult<ChallengeOutcome<'s>> {
    if is_expired(&state, now)? {
        return Ok(ChallengeOutcome::Expired);
    }
    if !state.is("opponent_id", user_id)? || state.flag("opponent_accepted")? {
        return Ok(ChallengeOutcome::Ignored);
    }
    state.save("opponent_accepted", true)?;
    Ok(ChallengeOutcome::Accepted(state))
}

fn on_decline<'s>(state: &StateData<'s>, user_id: &str) -> CodecResult<ChallengeOutcome<'s>> {
    if !state.is("opponent_id", user_id)? || state.flag("opponent_accepted")? {
        return Ok(ChallengeOutcome::Ignored);
    }
    Ok(ChallengeOutcome::Declined)
}

fn is_expired(state: &StateData<'_>, now: SystemTime) -> CodecResult<bool> {
    Ok(match state.get_timestamp("time_sent")? {
        Some(sent) => sent + CHALLENGE_TIMEOUT < now,
        None => true,
    })
}

//! Pure state transition function
//!
//! Given the same inputs this always produces the same outputs, with no
//! I/O side effects.

use super::{Effect, Event, SyncContext, TurnState};
use thiserror::Error;

/// Function names in a reply's side-effect tags that mean the world
/// model changed server-side and must be re-pulled.
const WORLD_REFRESH_FUNCTIONS: &[&str] = &["add_world_location", "add_npc", "update_quest"];

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("a turn is already in flight")]
    TurnInFlight,
    #[error("message is empty")]
    EmptyInput,
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &TurnState,
    _context: &SyncContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Idle + SubmitTurn -> Sending (optimistic append, then dispatch)
        (TurnState::Idle, Event::SubmitTurn { text }) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            Ok(TransitionResult::new(TurnState::Sending)
                .with_effect(Effect::AppendUserTurn {
                    text: trimmed.to_string(),
                })
                .with_effect(Effect::DispatchChat {
                    message: trimmed.to_string(),
                }))
        }

        // Only one turn may be in flight at a time
        (TurnState::Sending, Event::SubmitTurn { .. }) => Err(TransitionError::TurnInFlight),

        // Sending + TurnResolved -> Idle, fan-out in fixed order:
        // session rotation, game state, character, world reload
        // trigger, narrative. Character state is never applied after
        // the narrative text.
        (TurnState::Sending, Event::TurnResolved { reply }) => {
            let mut result = TransitionResult::new(TurnState::Idle);
            if let Some(session_id) = reply.session_id {
                result = result.with_effect(Effect::RotateSession { session_id });
            }
            if let Some(game_state) = reply.game_state {
                result = result.with_effect(Effect::ApplyGameState { game_state });
            }
            if let Some(character) = reply.character {
                result = result.with_effect(Effect::ApplyCharacter { character });
            }
            let world_changed = reply
                .function_calls
                .iter()
                .any(|call| WORLD_REFRESH_FUNCTIONS.contains(&call.function.as_str()));
            if world_changed {
                result = result.with_effect(Effect::ReloadWorld);
            }
            Ok(result.with_effect(Effect::AppendAssistantTurn {
                text: reply.response,
            }))
        }

        // Sending + TurnFailed -> Idle with the fixed notice; the
        // user's turn stays visible and nothing is retried
        (TurnState::Sending, Event::TurnFailed { detail }) => {
            Ok(TransitionResult::new(TurnState::Idle)
                .with_effect(Effect::AppendFailureNotice { detail }))
        }

        // Settlement events with no turn in flight
        (TurnState::Idle, event @ (Event::TurnResolved { .. } | Event::TurnFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{} received while idle",
                event.kind()
            )))
        }
    }
}

//! Effects produced by turn transitions
//!
//! Effects are applied by the runtime in the order produced; the fixed
//! fan-out order of a resolved turn lives in the transition function,
//! not here.

use crate::session::character::Character;
use crate::session::GameState;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append the user's turn to the conversation (optimistic,
    /// irrevocable)
    AppendUserTurn { text: String },
    /// Send the chat request to the gateway
    DispatchChat { message: String },
    /// A reply carried a new session identifier; it supersedes the
    /// current one for all subsequent calls
    RotateSession { session_id: String },
    /// Overwrite the derived game-state value
    ApplyGameState { game_state: GameState },
    /// Replace the character store wholesale
    ApplyCharacter { character: Character },
    /// Start an asynchronous world reload (fire and forget; its result
    /// arrives independently)
    ReloadWorld,
    /// Append the assistant's narrative text
    AppendAssistantTurn { text: String },
    /// Append the fixed failure notice; `detail` is for the log only
    AppendFailureNotice { detail: String },
}

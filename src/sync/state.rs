//! Turn lifecycle state

use crate::session::character::EditPolicy;
use serde::{Deserialize, Serialize};

/// Lifecycle of one chat turn. Submission is gated on `Idle`, which is
/// the backpressure mechanism: there is no client-side queue of a
/// second turn while one is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    /// A chat turn is in flight
    Sending,
}

impl TurnState {
    /// State query utility
    #[allow(dead_code)]
    pub fn is_busy(self) -> bool {
        self == TurnState::Sending
    }
}

/// Immutable configuration for the orchestrator
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncContext {
    pub edit_policy: EditPolicy,
}

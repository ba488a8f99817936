//! Events driving the turn lifecycle

use crate::gateway::types::ChatTurnReply;

#[derive(Debug, Clone)]
pub enum Event {
    /// User submitted input from the chat surface
    SubmitTurn { text: String },
    /// The in-flight chat turn resolved with a reply
    TurnResolved { reply: ChatTurnReply },
    /// The in-flight chat turn failed at the transport or status level
    TurnFailed { detail: String },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SubmitTurn { .. } => "submit_turn",
            Event::TurnResolved { .. } => "turn_resolved",
            Event::TurnFailed { .. } => "turn_failed",
        }
    }
}

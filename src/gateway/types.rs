//! Wire types for the game-master gateway

use crate::session::character::Character;
use crate::session::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// One chat turn from the client. The session id is omitted when none
/// has been acquired yet; the gateway then mints one lazily and returns
/// it in the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub model_id: String,
}

/// A server-reported side-effect tag: the game master mutated world or
/// character state during the turn. Arguments are kept loose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FunctionCall {
    pub function: String,
    #[serde(flatten)]
    pub arguments: BTreeMap<String, Value>,
}

/// Reply to one chat turn. Only `response` is guaranteed; absence of
/// any other field means "no update to that facet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurnReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_calls: Vec<FunctionCall>,
}

impl ChatTurnReply {
    /// A reply that updates nothing but the transcript.
    #[allow(dead_code)] // Constructor for tests and API completeness
    pub fn narrative(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            session_id: None,
            game_state: None,
            character: None,
            function_calls: Vec::new(),
        }
    }
}

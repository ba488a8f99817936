//! Session-local state: the three stores plus the model catalog.
//!
//! Each store is mutated only through its own operations; the runtime
//! serializes access so no two in-flight requests touch a store
//! concurrently.

pub mod catalog;
pub mod character;
pub mod conversation;
pub mod world;

use serde::{Deserialize, Serialize};

/// Game phase as reported by the game-master service.
///
/// The client never infers this locally; the authoritative value always
/// comes from a chat response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    CharacterCreation,
    Combat,
    Adventure,
}

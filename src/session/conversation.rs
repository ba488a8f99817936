//! Append-only conversation log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed notice appended in place of a narrative reply when a chat turn
/// fails. The user's own turn is never retracted.
pub const GATEWAY_FAILURE_NOTICE: &str =
    "Sorry, there was an error connecting to the game master. Please try again.";

/// Speaker role for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One message in the conversation. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Ordered log of turns plus the turn-in-flight flag.
///
/// Turns are never deleted or mutated after insertion. A user turn is
/// appended optimistically before its network call resolves; on failure
/// an explanatory assistant turn is appended instead of rolling back.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
    loading: bool,
}

impl ConversationStore {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[allow(dead_code)] // Log query utility
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True strictly for the duration of one in-flight chat turn.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn append_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::new(Role::User, content));
    }

    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::new(Role::Assistant, content));
    }

    /// Used only to annotate a model switch.
    pub fn append_system(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::new(Role::System, content));
    }

    /// Append the fixed failure notice as an assistant turn.
    pub fn append_failure(&mut self) {
        self.turns
            .push(Turn::new(Role::Assistant, GATEWAY_FAILURE_NOTICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_order() {
        let mut store = ConversationStore::default();
        store.append_user("I open the door");
        store.append_assistant("It creaks open.");
        store.append_system("Model switched");

        let roles: Vec<Role> = store.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::System]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn failure_appends_fixed_notice_as_assistant() {
        let mut store = ConversationStore::default();
        store.append_user("I swing my sword");
        store.append_failure();

        let last = store.turns().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, GATEWAY_FAILURE_NOTICE);
    }

    #[test]
    fn loading_flag_round_trips() {
        let mut store = ConversationStore::default();
        assert!(!store.is_loading());
        store.set_loading(true);
        assert!(store.is_loading());
        store.set_loading(false);
        assert!(!store.is_loading());
    }
}

//! Character sheet store with draft-edit semantics
//!
//! The sheet is loosely typed on the wire: well-known fields get
//! explicit optional slots, anything else lands in `extra`. Emptiness
//! is a first-class state, never inferred from key absence.

use super::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Player character sheet. No schema is enforced by the client; fields
/// are rendered only if present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Character {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constitution: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wisdom: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charisma: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i64>,
    #[serde(
        rename = "currentHp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_hp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<String>>,
    /// Attributes the client has no dedicated slot for.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Character {
    /// A sheet with nothing set at all.
    #[allow(dead_code)] // Sheet query utility
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.race.is_none()
            && self.class.is_none()
            && self.background.is_none()
            && self.strength.is_none()
            && self.dexterity.is_none()
            && self.constitution.is_none()
            && self.intelligence.is_none()
            && self.wisdom.is_none()
            && self.charisma.is_none()
            && self.hp.is_none()
            && self.current_hp.is_none()
            && self.inventory.is_none()
            && self.extra.is_empty()
    }

    /// Whether the sheet is complete enough to show: a non-blank name.
    pub fn has_identity(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Replace one attribute by key. Known keys get coerced into their
    /// typed slot; unknown keys go to `extra`. A null value clears.
    pub fn set_field(&mut self, name: &str, value: &Value) {
        match name {
            "name" => self.name = as_text(value),
            "race" => self.race = as_text(value),
            "class" => self.class = as_text(value),
            "background" => self.background = as_text(value),
            "strength" => self.strength = as_int(value),
            "dexterity" => self.dexterity = as_int(value),
            "constitution" => self.constitution = as_int(value),
            "intelligence" => self.intelligence = as_int(value),
            "wisdom" => self.wisdom = as_int(value),
            "charisma" => self.charisma = as_int(value),
            "hp" => self.hp = as_int(value),
            "currentHp" | "current_hp" => self.current_hp = as_int(value),
            "inventory" => self.inventory = as_string_list(value),
            _ => {
                if value.is_null() {
                    self.extra.remove(name);
                } else {
                    self.extra.insert(name.to_string(), value.clone());
                }
            }
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn as_string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), ToString::to_string))
            .collect()
    })
}

/// Whether editing is allowed outside the `character_creation` phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditPolicy {
    pub allow_edit_outside_creation: bool,
}

/// Errors from the edit workflow
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("character editing is only available during character creation")]
    Locked,
    #[error("no edit in progress")]
    NotEditing,
}

/// Holds the latest known character sheet plus an optional edit draft.
///
/// Loads and chat payloads replace the sheet wholesale; there is no
/// field-level merge. Draft mutations never touch the authoritative
/// sheet until a save round-trips through the gateway.
#[derive(Debug, Default)]
pub struct CharacterStore {
    character: Option<Character>,
    draft: Option<Character>,
    visible: bool,
    last_save_error: Option<String>,
}

impl CharacterStore {
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn draft(&self) -> Option<&Character> {
        self.draft.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Wholesale replacement from a load or a chat-turn payload.
    /// Promotes the panel when the sheet carries an identity.
    pub fn replace(&mut self, character: Character) {
        if character.has_identity() {
            self.visible = true;
        }
        self.character = Some(character);
    }

    /// Manual user toggle; the only way the panel auto-hides is never.
    pub fn toggle_panel(&mut self) {
        self.visible = !self.visible;
    }

    /// Snapshot the current sheet into a draft. Re-entering edit mode
    /// re-snapshots, discarding any prior draft.
    pub fn begin_edit(&mut self, game_state: GameState, policy: EditPolicy) -> Result<(), EditError> {
        if game_state != GameState::CharacterCreation && !policy.allow_edit_outside_creation {
            return Err(EditError::Locked);
        }
        self.draft = Some(self.character.clone().unwrap_or_default());
        Ok(())
    }

    pub fn set_draft_field(&mut self, name: &str, value: &Value) -> Result<(), EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NotEditing)?;
        draft.set_field(name, value);
        Ok(())
    }

    pub fn set_inventory_item(&mut self, index: usize, value: String) -> Result<(), EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NotEditing)?;
        let inventory = draft.inventory.get_or_insert_with(Vec::new);
        if let Some(slot) = inventory.get_mut(index) {
            *slot = value;
        }
        Ok(())
    }

    pub fn add_inventory_item(&mut self) -> Result<(), EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NotEditing)?;
        draft.inventory.get_or_insert_with(Vec::new).push(String::new());
        Ok(())
    }

    pub fn remove_inventory_item(&mut self, index: usize) -> Result<(), EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NotEditing)?;
        if let Some(inventory) = draft.inventory.as_mut() {
            if index < inventory.len() {
                inventory.remove(index);
            }
        }
        Ok(())
    }

    /// The draft to send to the gateway write endpoint.
    pub fn draft_for_save(&self) -> Result<Character, EditError> {
        self.draft.clone().ok_or(EditError::NotEditing)
    }

    /// Gateway write succeeded: the draft becomes authoritative and
    /// edit mode ends.
    pub fn complete_save(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.last_save_error = None;
            self.replace(draft);
        }
    }

    /// Gateway write failed: stay in edit mode with the draft intact
    /// and surface the error for an inline banner.
    pub fn record_save_error(&mut self, message: impl Into<String>) {
        self.last_save_error = Some(message.into());
    }

    /// Discard the draft; the authoritative sheet is untouched.
    pub fn cancel_edit(&mut self) {
        self.draft = None;
        self.last_save_error = None;
    }
}

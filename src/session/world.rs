//! World model store
//!
//! Read-only from the client's perspective: all mutation happens
//! server-side and is only ever pulled, never pushed.

use serde::{Deserialize, Serialize};

/// A known place in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points_of_interest: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Npc {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Quest {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
}

/// Everything the game-master service has told us about the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldModel {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

impl WorldModel {
    /// Panel visibility derives from this, never from an explicit flag.
    pub fn has_content(&self) -> bool {
        !self.locations.is_empty() || !self.npcs.is_empty() || !self.quests.is_empty()
    }
}

/// Which world sequence the panel is focused on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorldTab {
    #[default]
    Locations,
    Npcs,
    Quests,
}

/// Latest known world model plus the selected-tab cursor
#[derive(Debug, Default)]
pub struct WorldStore {
    world: Option<WorldModel>,
    visible: bool,
    tab: WorldTab,
}

impl WorldStore {
    pub fn world(&self) -> Option<&WorldModel> {
        self.world.as_ref()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn tab(&self) -> WorldTab {
        self.tab
    }

    /// The toggle control is disabled iff all three sequences are empty
    /// or world data is absent.
    pub fn toggle_enabled(&self) -> bool {
        self.world.as_ref().is_some_and(WorldModel::has_content)
    }

    /// Wholesale replacement from a fetch; promotes the panel when any
    /// sequence is non-empty.
    pub fn replace(&mut self, world: WorldModel) {
        if world.has_content() {
            self.visible = true;
        }
        self.world = Some(world);
    }

    /// Manual user toggle; rejected while no world data exists.
    pub fn toggle_panel(&mut self) -> bool {
        if !self.toggle_enabled() {
            return false;
        }
        self.visible = !self.visible;
        true
    }

    /// Pure local state, no network effect.
    pub fn select_tab(&mut self, tab: WorldTab) {
        self.tab = tab;
    }
}

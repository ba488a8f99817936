//! Model catalog: which game-master models exist and which is selected

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Descriptor for one selectable model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModelInfo {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

/// Mapping of model id to descriptor, fetched once at startup, with a
/// built-in fallback when the fetch fails or comes back empty. The
/// selection is a single pointer into the mapping, defaulting to the
/// first key.
#[derive(Debug)]
pub struct ModelCatalog {
    models: BTreeMap<String, ModelInfo>,
    selected: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let models = built_in_models();
        let selected = models.keys().next().cloned().unwrap_or_default();
        Self { models, selected }
    }
}

fn built_in_models() -> BTreeMap<String, ModelInfo> {
    let mut models = BTreeMap::new();
    models.insert(
        "gemini-1.5-pro".to_string(),
        ModelInfo {
            description: "Google Gemini 1.5 Pro".to_string(),
        },
    );
    models.insert(
        "local".to_string(),
        ModelInfo {
            description: "Local Ollama".to_string(),
        },
    );
    models
}

impl ModelCatalog {
    pub fn models(&self) -> &BTreeMap<String, ModelInfo> {
        &self.models
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Human-readable label for the selection (description, or the id
    /// when the descriptor carries none).
    pub fn selected_label(&self) -> &str {
        self.models
            .get(&self.selected)
            .filter(|info| !info.description.is_empty())
            .map_or(self.selected.as_str(), |info| info.description.as_str())
    }

    /// Adopt a fetched catalog. An empty fetch keeps the built-in
    /// mapping; a selection that no longer exists falls back to the
    /// first key.
    pub fn replace(&mut self, models: BTreeMap<String, ModelInfo>) {
        if models.is_empty() {
            return;
        }
        if !models.contains_key(&self.selected) {
            self.selected = models.keys().next().cloned().unwrap_or_default();
        }
        self.models = models;
    }

    /// Move the selection pointer. Returns whether it actually changed;
    /// reselecting the current model is a no-op.
    pub fn select(&mut self, model_id: &str) -> Result<bool, CatalogError> {
        if !self.models.contains_key(model_id) {
            return Err(CatalogError::UnknownModel(model_id.to_string()));
        }
        if self.selected == model_id {
            return Ok(false);
        }
        self.selected = model_id.to_string();
        Ok(true)
    }
}

//! Request/response types for the API

use crate::session::world::WorldTab;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ChatSubmitRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldEditRequest {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct InventorySetRequest {
    pub index: usize,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct InventoryRemoveRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct WorldTabRequest {
    pub tab: WorldTab,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub ok: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

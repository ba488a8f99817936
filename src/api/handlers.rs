//! HTTP request handlers

use super::sse::state_stream;
use super::types::{
    ChatSubmitRequest, ErrorResponse, FieldEditRequest, InventoryRemoveRequest,
    InventorySetRequest, SelectModelRequest, SuccessResponse, VersionResponse, WorldTabRequest,
};
use super::AppState;
use crate::runtime::SessionSnapshot;
use crate::session::catalog::CatalogError;
use crate::session::character::EditError;
use crate::sync::TransitionError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Full state snapshot
        .route("/api/state", get(get_state))
        // Real-time state stream
        .route("/api/events", get(stream_events))
        // Chat turn submission
        .route("/api/chat", post(submit_chat))
        // Model selection (local only; rides the next chat turn)
        .route("/api/model", post(select_model))
        // Character edit workflow
        .route("/api/character/edit", post(begin_edit))
        .route("/api/character/edit/field", post(edit_field))
        .route("/api/character/edit/inventory", post(set_inventory_item))
        .route("/api/character/edit/inventory/add", post(add_inventory_item))
        .route(
            "/api/character/edit/inventory/remove",
            post(remove_inventory_item),
        )
        .route("/api/character/edit/save", post(save_character))
        .route("/api/character/edit/cancel", post(cancel_edit))
        // Panel toggles
        .route("/api/panels/character/toggle", post(toggle_character_panel))
        .route("/api/panels/world/toggle", post(toggle_world_panel))
        // World tab cursor
        .route("/api/world/tab", post(select_world_tab))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

async fn get_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.runtime.snapshot().await)
}

async fn stream_events(State(state): State<AppState>) -> impl IntoResponse {
    let init = state.runtime.snapshot().await;
    let updates = state.runtime.subscribe();
    state_stream(init, updates)
}

async fn submit_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatSubmitRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let runtime = state.runtime.clone();
    runtime.submit_turn(req.message).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn select_model(
    State(state): State<AppState>,
    Json(req): Json<SelectModelRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.select_model(&req.model_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn begin_edit(State(state): State<AppState>) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.begin_edit().await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn edit_field(
    State(state): State<AppState>,
    Json(req): Json<FieldEditRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.set_draft_field(&req.name, &req.value).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn set_inventory_item(
    State(state): State<AppState>,
    Json(req): Json<InventorySetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.set_inventory_item(req.index, req.value).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn add_inventory_item(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.add_inventory_item().await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn remove_inventory_item(
    State(state): State<AppState>,
    Json(req): Json<InventoryRemoveRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.remove_inventory_item(req.index).await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn save_character(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.save_character().await?;
    Ok(Json(SuccessResponse::ok()))
}

async fn cancel_edit(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.runtime.cancel_edit().await;
    Json(SuccessResponse::ok())
}

async fn toggle_character_panel(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.runtime.toggle_character_panel().await;
    Json(SuccessResponse::ok())
}

async fn toggle_world_panel(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.runtime.toggle_world_panel().await {
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(AppError::Conflict(
            "world panel is unavailable until world data arrives".to_string(),
        ))
    }
}

async fn select_world_tab(
    State(state): State<AppState>,
    Json(req): Json<WorldTabRequest>,
) -> Json<SuccessResponse> {
    state.runtime.select_world_tab(req.tab).await;
    Json(SuccessResponse::ok())
}

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Error handling
// ============================================================

/// API error with status mapping
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<TransitionError> for AppError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::TurnInFlight => AppError::Conflict(error.to_string()),
            TransitionError::EmptyInput | TransitionError::InvalidTransition(_) => {
                AppError::BadRequest(error.to_string())
            }
        }
    }
}

impl From<EditError> for AppError {
    fn from(error: EditError) -> Self {
        match error {
            EditError::Locked => AppError::Conflict(error.to_string()),
            EditError::NotEditing => AppError::BadRequest(error.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(error: CatalogError) -> Self {
        AppError::BadRequest(error.to_string())
    }
}

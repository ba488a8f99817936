//! Session runtime
//!
//! Owns the stores, drives the pure turn transition, executes its
//! effects in order, and broadcasts a state snapshot to SSE
//! subscribers after every mutation. All store access goes through one
//! async lock, so turns are strictly serialized; the only exception is
//! the triggered world reload, which is spawned fire-and-forget and may
//! settle after a later turn has begun.


use crate::gateway::types::ChatTurnRequest;
use crate::gateway::{GameMasterGateway, HttpGateway};
use crate::session::catalog::{CatalogError, ModelCatalog, ModelInfo};
use crate::session::character::{CharacterStore, EditError};
use crate::session::conversation::{ConversationStore, Turn};
use crate::session::world::{WorldStore, WorldTab};
use crate::session::GameState;
use crate::session::{character::Character, world::WorldModel};
use crate::sync::{transition, Effect, Event, SyncContext, TransitionError, TurnState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Runtime bound to the real HTTP gateway
pub type ProductionRuntime = SessionRuntime<HttpGateway>;

/// Full state snapshot published to the UI after every change
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub game_state: GameState,
    pub turn_state: TurnState,
    pub is_loading: bool,
    pub turns: Vec<Turn>,
    pub character: Option<Character>,
    pub character_draft: Option<Character>,
    pub is_editing: bool,
    pub last_save_error: Option<String>,
    pub show_character_panel: bool,
    pub world: Option<WorldModel>,
    pub world_tab: WorldTab,
    pub world_toggle_enabled: bool,
    pub show_world_panel: bool,
    pub models: BTreeMap<String, ModelInfo>,
    pub selected_model: String,
}

#[derive(Debug, Default)]
struct SessionInner {
    turn_state: TurnState,
    session_id: Option<String>,
    game_state: GameState,
    character: CharacterStore,
    world: WorldStore,
    conversation: ConversationStore,
    catalog: ModelCatalog,
}

impl SessionInner {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            game_state: self.game_state,
            turn_state: self.turn_state,
            is_loading: self.conversation.is_loading(),
            turns: self.conversation.turns().to_vec(),
            character: self.character.character().cloned(),
            character_draft: self.character.draft().cloned(),
            is_editing: self.character.is_editing(),
            last_save_error: self.character.last_save_error().map(str::to_string),
            show_character_panel: self.character.visible(),
            world: self.world.world().cloned(),
            world_tab: self.world.tab(),
            world_toggle_enabled: self.world.toggle_enabled(),
            show_world_panel: self.world.visible(),
            models: self.catalog.models().clone(),
            selected_model: self.catalog.selected().to_string(),
        }
    }
}

/// Generic session runtime; the gateway is a type parameter so tests
/// run against a mock.
pub struct SessionRuntime<G> {
    gateway: G,
    context: SyncContext,
    inner: RwLock<SessionInner>,
    events: broadcast::Sender<SessionSnapshot>,
}

impl<G> SessionRuntime<G>
where
    G: GameMasterGateway + 'static,
{
    pub fn new(gateway: G, context: SyncContext) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            gateway,
            context,
            inner: RwLock::new(SessionInner::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.snapshot()
    }

    fn publish(&self, inner: &SessionInner) {
        // Nobody listening is fine; snapshots are purely advisory.
        let _ = self.events.send(inner.snapshot());
    }

    /// One-shot startup: create the session (a single failed attempt is
    /// terminal for the identifier until restart), then pull the
    /// initial character, world, and catalog.
    pub async fn start(&self) {
        match self.gateway.create_session().await {
            Ok(created) => {
                tracing::info!(session_id = %created.session_id, "Session created");
                let mut inner = self.inner.write().await;
                inner.session_id = Some(created.session_id);
                self.publish(&inner);
            }
            Err(error) => {
                tracing::warn!(error = %error, "Session creation failed; continuing without a session");
            }
        }

        self.reload_character().await;
        self.reload_world().await;
        self.load_catalog().await;
    }

    async fn current_session(&self) -> Option<String> {
        self.inner.read().await.session_id.clone()
    }

    /// Fetch the character sheet and replace it wholesale. No-op
    /// without a session; failure keeps the last known sheet.
    pub async fn reload_character(&self) {
        let Some(session_id) = self.current_session().await else {
            return;
        };
        match self.gateway.get_character(&session_id).await {
            Ok(character) => {
                let mut inner = self.inner.write().await;
                inner.character.replace(character);
                self.publish(&inner);
            }
            Err(error) => {
                tracing::warn!(error = %error, "Character fetch failed; keeping last known sheet");
            }
        }
    }

    /// Fetch the world model and replace it wholesale. No-op without a
    /// session; failure keeps the last known model.
    pub async fn reload_world(&self) {
        let Some(session_id) = self.current_session().await else {
            return;
        };
        match self.gateway.get_world(&session_id).await {
            Ok(world) => {
                let mut inner = self.inner.write().await;
                inner.world.replace(world);
                self.publish(&inner);
            }
            Err(error) => {
                tracing::warn!(error = %error, "World fetch failed; keeping last known model");
            }
        }
    }

    /// Fetch the model catalog once. Failure or an empty catalog keeps
    /// the built-in mapping.
    pub async fn load_catalog(&self) {
        match self.gateway.get_models().await {
            Ok(models) => {
                let mut inner = self.inner.write().await;
                inner.catalog.replace(models);
                self.publish(&inner);
            }
            Err(error) => {
                tracing::warn!(error = %error, "Model catalog fetch failed; using built-in catalog");
            }
        }
    }

    /// Submit one chat turn. Rejected while a turn is in flight or when
    /// the input is whitespace-only; an accepted turn always settles
    /// back to idle with the loading flag cleared, success or not.
    pub async fn submit_turn(self: Arc<Self>, text: String) -> Result<(), TransitionError> {
        // Phase 1: gate and optimistically append under the lock.
        let request = {
            let mut inner = self.inner.write().await;
            let submitted = transition(
                &inner.turn_state,
                &self.context,
                Event::SubmitTurn { text },
            )?;
            inner.turn_state = submitted.new_state;

            let mut message = None;
            for effect in submitted.effects {
                match effect {
                    Effect::AppendUserTurn { text } => inner.conversation.append_user(text),
                    Effect::DispatchChat { message: m } => message = Some(m),
                    other => {
                        tracing::error!(?other, "Unexpected submission effect");
                    }
                }
            }
            inner.conversation.set_loading(true);
            self.publish(&inner);

            message.map(|message| ChatTurnRequest {
                message,
                session_id: inner.session_id.clone(),
                model_id: inner.catalog.selected().to_string(),
            })
        };
        let Some(request) = request else {
            return Ok(());
        };

        // Suspension point: the chat round trip, outside the lock.
        let event = match self.gateway.send_chat(&request).await {
            Ok(reply) => Event::TurnResolved { reply },
            Err(error) => {
                tracing::warn!(error = %error, kind = ?error.kind, "Chat turn failed");
                Event::TurnFailed {
                    detail: error.to_string(),
                }
            }
        };

        // Phase 2: settle. The loading flag is cleared on every path.
        let mut inner = self.inner.write().await;
        match transition(&inner.turn_state, &self.context, event) {
            Ok(settled) => {
                inner.turn_state = settled.new_state;
                for effect in settled.effects {
                    Self::apply_settled_effect(&self, &mut inner, effect);
                }
            }
            Err(error) => {
                tracing::error!(error = %error, "Turn settlement rejected; resetting to idle");
                inner.turn_state = TurnState::Idle;
            }
        }
        inner.conversation.set_loading(false);
        self.publish(&inner);
        Ok(())
    }

    fn apply_settled_effect(runtime: &Arc<Self>, inner: &mut SessionInner, effect: Effect) {
        match effect {
            Effect::RotateSession { session_id } => {
                tracing::info!(%session_id, "Session identifier rotated");
                inner.session_id = Some(session_id);
            }
            Effect::ApplyGameState { game_state } => inner.game_state = game_state,
            Effect::ApplyCharacter { character } => inner.character.replace(character),
            Effect::ReloadWorld => {
                // Fire and forget: completion races with later turns.
                let task_runtime = Arc::clone(runtime);
                tokio::spawn(async move { task_runtime.reload_world().await });
            }
            Effect::AppendAssistantTurn { text } => inner.conversation.append_assistant(text),
            Effect::AppendFailureNotice { detail } => {
                tracing::warn!(%detail, "Appending failure notice");
                inner.conversation.append_failure();
            }
            Effect::AppendUserTurn { .. } | Effect::DispatchChat { .. } => {
                tracing::error!("Submission effect reached settlement");
            }
        }
    }

    /// Local-only model switch; a genuine change is annotated with a
    /// system turn and rides the next chat request.
    pub async fn select_model(&self, model_id: &str) -> Result<(), CatalogError> {
        let mut inner = self.inner.write().await;
        let changed = inner.catalog.select(model_id)?;
        if changed {
            let label = inner.catalog.selected_label().to_string();
            inner
                .conversation
                .append_system(format!("Model switched to {label}"));
            self.publish(&inner);
        }
        Ok(())
    }

    pub async fn begin_edit(&self) -> Result<(), EditError> {
        let mut inner = self.inner.write().await;
        let game_state = inner.game_state;
        inner
            .character
            .begin_edit(game_state, self.context.edit_policy)?;
        self.publish(&inner);
        Ok(())
    }

    pub async fn set_draft_field(
        &self,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<(), EditError> {
        let mut inner = self.inner.write().await;
        inner.character.set_draft_field(name, value)?;
        self.publish(&inner);
        Ok(())
    }

    pub async fn set_inventory_item(&self, index: usize, value: String) -> Result<(), EditError> {
        let mut inner = self.inner.write().await;
        inner.character.set_inventory_item(index, value)?;
        self.publish(&inner);
        Ok(())
    }

    pub async fn add_inventory_item(&self) -> Result<(), EditError> {
        let mut inner = self.inner.write().await;
        inner.character.add_inventory_item()?;
        self.publish(&inner);
        Ok(())
    }

    pub async fn remove_inventory_item(&self, index: usize) -> Result<(), EditError> {
        let mut inner = self.inner.write().await;
        inner.character.remove_inventory_item(index)?;
        self.publish(&inner);
        Ok(())
    }

    /// Send the draft to the gateway write endpoint. On failure the
    /// draft and edit mode survive and the error is surfaced on the
    /// snapshot for an inline banner.
    pub async fn save_character(&self) -> Result<(), EditError> {
        let (session_id, draft) = {
            let inner = self.inner.read().await;
            (inner.session_id.clone(), inner.character.draft_for_save()?)
        };
        let Some(session_id) = session_id else {
            let mut inner = self.inner.write().await;
            inner.character.record_save_error("no active session");
            self.publish(&inner);
            return Ok(());
        };

        match self.gateway.set_character(&session_id, &draft).await {
            Ok(()) => {
                let mut inner = self.inner.write().await;
                inner.character.complete_save();
                self.publish(&inner);
            }
            Err(error) => {
                tracing::warn!(error = %error, "Character save failed; keeping draft");
                let mut inner = self.inner.write().await;
                inner.character.record_save_error(error.to_string());
                self.publish(&inner);
            }
        }
        Ok(())
    }

    pub async fn cancel_edit(&self) {
        let mut inner = self.inner.write().await;
        inner.character.cancel_edit();
        self.publish(&inner);
    }

    pub async fn toggle_character_panel(&self) {
        let mut inner = self.inner.write().await;
        inner.character.toggle_panel();
        self.publish(&inner);
    }

    /// Returns false while the toggle is disabled (no world data).
    pub async fn toggle_world_panel(&self) -> bool {
        let mut inner = self.inner.write().await;
        let toggled = inner.world.toggle_panel();
        if toggled {
            self.publish(&inner);
        }
        toggled
    }

    pub async fn select_world_tab(&self, tab: WorldTab) {
        let mut inner = self.inner.write().await;
        inner.world.select_tab(tab);
        self.publish(&inner);
    }
}

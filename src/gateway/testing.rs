//! Mock gateway for runtime tests
//!
//! Queued responses override benign defaults, so a test only scripts
//! the calls it cares about. Requests are recorded for inspection.

use super::types::{ChatTurnReply, ChatTurnRequest, SessionCreated};
use super::{GameMasterGateway, GatewayError};
use crate::session::catalog::ModelInfo;
use crate::session::character::Character;
use crate::session::world::WorldModel;
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct MockGateway {
    sessions: Mutex<VecDeque<Result<SessionCreated, GatewayError>>>,
    characters: Mutex<VecDeque<Result<Character, GatewayError>>>,
    worlds: Mutex<VecDeque<Result<WorldModel, GatewayError>>>,
    catalogs: Mutex<VecDeque<Result<BTreeMap<String, ModelInfo>, GatewayError>>>,
    chats: Mutex<VecDeque<Result<ChatTurnReply, GatewayError>>>,
    saves: Mutex<VecDeque<Result<(), GatewayError>>>,
    chat_gate: Mutex<Option<Arc<Notify>>>,
    /// Record of all chat requests made
    pub chat_requests: Mutex<Vec<ChatTurnRequest>>,
    /// Record of all character writes made
    pub saved_characters: Mutex<Vec<(String, Character)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_session(&self, result: Result<SessionCreated, GatewayError>) {
        self.sessions.lock().unwrap().push_back(result);
    }

    pub fn queue_character(&self, result: Result<Character, GatewayError>) {
        self.characters.lock().unwrap().push_back(result);
    }

    pub fn queue_world(&self, result: Result<WorldModel, GatewayError>) {
        self.worlds.lock().unwrap().push_back(result);
    }

    pub fn queue_catalog(&self, result: Result<BTreeMap<String, ModelInfo>, GatewayError>) {
        self.catalogs.lock().unwrap().push_back(result);
    }

    pub fn queue_chat(&self, result: Result<ChatTurnReply, GatewayError>) {
        self.chats.lock().unwrap().push_back(result);
    }

    pub fn queue_save(&self, result: Result<(), GatewayError>) {
        self.saves.lock().unwrap().push_back(result);
    }

    /// Make chat calls block until the returned handle is notified.
    pub fn hold_chats(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chat_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn recorded_chat_requests(&self) -> Vec<ChatTurnRequest> {
        self.chat_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameMasterGateway for MockGateway {
    async fn create_session(&self) -> Result<SessionCreated, GatewayError> {
        self.sessions.lock().unwrap().pop_front().unwrap_or(Ok(SessionCreated {
            session_id: "session-test".to_string(),
        }))
    }

    async fn get_character(&self, _session_id: &str) -> Result<Character, GatewayError> {
        self.characters
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Character::default()))
    }

    async fn set_character(
        &self,
        session_id: &str,
        character: &Character,
    ) -> Result<(), GatewayError> {
        self.saved_characters
            .lock()
            .unwrap()
            .push((session_id.to_string(), character.clone()));
        self.saves.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn get_world(&self, _session_id: &str) -> Result<WorldModel, GatewayError> {
        self.worlds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(WorldModel::default()))
    }

    async fn get_models(&self) -> Result<BTreeMap<String, ModelInfo>, GatewayError> {
        self.catalogs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(BTreeMap::new()))
    }

    async fn send_chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnReply, GatewayError> {
        let gate = self.chat_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.chat_requests.lock().unwrap().push(request.clone());
        self.chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::transport("no scripted chat reply")))
    }
}

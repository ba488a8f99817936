//! Remote game-master gateway
//!
//! The five operations from the service contract, behind a trait so the
//! runtime can be exercised against a mock. No call is retried
//! automatically; every caller handles its own failure locally.

mod http;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use self::http::HttpGateway;

use crate::session::catalog::ModelInfo;
use crate::session::character::Character;
use crate::session::world::WorldModel;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;
use self::types::{ChatTurnReply, ChatTurnRequest, SessionCreated};

/// Gateway failure with coarse classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Network failure or timeout before a response arrived
    Transport,
    /// Response arrived with a non-success status
    Status,
    /// Response body could not be decoded
    Decode,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Transport, message)
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Status, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Decode, message)
    }
}

/// The remote game-master service contract
#[async_trait]
pub trait GameMasterGateway: Send + Sync {
    /// Mint a new session identifier. Called exactly once at startup.
    async fn create_session(&self) -> Result<SessionCreated, GatewayError>;

    /// Fetch the character sheet for a session (possibly empty).
    async fn get_character(&self, session_id: &str) -> Result<Character, GatewayError>;

    /// Persist an edited character sheet.
    async fn set_character(
        &self,
        session_id: &str,
        character: &Character,
    ) -> Result<(), GatewayError>;

    /// Fetch the world model for a session.
    async fn get_world(&self, session_id: &str) -> Result<WorldModel, GatewayError>;

    /// Fetch the model catalog (may be empty).
    async fn get_models(&self) -> Result<BTreeMap<String, ModelInfo>, GatewayError>;

    /// Send one chat turn and receive the narrative plus any facet
    /// updates.
    async fn send_chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnReply, GatewayError>;
}

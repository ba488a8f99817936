//! HTTP implementation of the gateway contract

use super::types::{ChatTurnReply, ChatTurnRequest, SessionCreated};
use super::{GameMasterGateway, GatewayError};
use crate::session::catalog::ModelInfo;
use crate::session::character::Character;
use crate::session::world::WorldModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// JSON-over-HTTP client for the game-master service
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct SaveCharacterBody<'a> {
    session_id: &'a str,
    character: &'a Character,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::status(format!("gateway returned {status}")))
        }
    }
}

#[async_trait]
impl GameMasterGateway for HttpGateway {
    async fn create_session(&self) -> Result<SessionCreated, GatewayError> {
        let response = self
            .client
            .post(self.url("/session"))
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        Self::expect_success(response)?
            .json()
            .await
            .map_err(|e| GatewayError::decode(e.to_string()))
    }

    async fn get_character(&self, session_id: &str) -> Result<Character, GatewayError> {
        let response = self
            .client
            .get(self.url("/character"))
            .query(&[("session_id", session_id)])
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        Self::expect_success(response)?
            .json()
            .await
            .map_err(|e| GatewayError::decode(e.to_string()))
    }

    async fn set_character(
        &self,
        session_id: &str,
        character: &Character,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/character"))
            .json(&SaveCharacterBody {
                session_id,
                character,
            })
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        Self::expect_success(response)?;
        Ok(())
    }

    async fn get_world(&self, session_id: &str) -> Result<WorldModel, GatewayError> {
        let response = self
            .client
            .get(self.url("/world"))
            .query(&[("session_id", session_id)])
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        Self::expect_success(response)?
            .json()
            .await
            .map_err(|e| GatewayError::decode(e.to_string()))
    }

    async fn get_models(&self) -> Result<BTreeMap<String, ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(self.url("/models"))
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        Self::expect_success(response)?
            .json()
            .await
            .map_err(|e| GatewayError::decode(e.to_string()))
    }

    async fn send_chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnReply, GatewayError> {
        let response = self
            .client
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        Self::expect_success(response)?
            .json()
            .await
            .map_err(|e| GatewayError::decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let gateway = HttpGateway::new("http://localhost:5000/").unwrap();
        assert_eq!(gateway.url("/chat"), "http://localhost:5000/chat");
    }
}

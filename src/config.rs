//! Environment-driven configuration

use crate::session::character::EditPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the game-master service
    pub gateway_url: String,
    /// Port for the local UI server
    pub port: u16,
    pub edit_policy: EditPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        let gateway_url = std::env::var("GM_GATEWAY_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let port: u16 = std::env::var("GM_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let allow_edit_outside_creation = std::env::var("GM_ALLOW_EDIT_ANYTIME")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        Self {
            gateway_url,
            port,
            edit_policy: EditPolicy {
                allow_edit_outside_creation,
            },
        }
    }
}

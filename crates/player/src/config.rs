//! Player configuration

use std::env;

use aimmo_domain::{ConnectionParameters, GameId};
use aimmo_store::StoreConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

/// Player configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Code API base URL
    pub api_url: String,
    /// Game to play and how to reach it
    pub connection: ConnectionParameters,
    /// How many actions each epic may lag behind
    pub action_buffer: usize,
}

impl PlayerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; unset keys take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let game_id: GameId = var("AIMMO_GAME_ID", "1")
            .parse()
            .map_err(|e| ConfigError::invalid("AIMMO_GAME_ID", e))?;

        let action_buffer: usize = var("AIMMO_ACTION_BUFFER", "256")
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid("AIMMO_ACTION_BUFFER", e))?;
        if action_buffer == 0 {
            return Err(ConfigError::invalid("AIMMO_ACTION_BUFFER", "must be at least 1"));
        }

        let connection = ConnectionParameters::new(
            game_id,
            var("AIMMO_GAME_URL", "ws://localhost:5000"),
            var("AIMMO_GAME_PATH", "/game-1/socket.io"),
            var("AIMMO_TOKEN", ""),
        );
        connection
            .socket_url()
            .map_err(|e| ConfigError::invalid("AIMMO_GAME_URL", e))?;

        Ok(Self {
            api_url: var("AIMMO_API_URL", "http://localhost:8000/aimmo/api"),
            connection,
            action_buffer,
        })
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            action_buffer: self.action_buffer,
        }
    }
}

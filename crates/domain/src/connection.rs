use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DomainError;
use crate::ids::GameId;

/// Where and as whom to connect to a running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    pub game_id: GameId,
    /// Base URL of the game server, e.g. `ws://localhost:5000`.
    pub game_url: String,
    /// Socket path on the game server, e.g. `/game-1/socket.io`.
    pub game_path: String,
    /// Avatar token. Empty for anonymous spectating.
    #[serde(default)]
    pub token: String,
}

impl ConnectionParameters {
    pub fn new(
        game_id: GameId,
        game_url: impl Into<String>,
        game_path: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            game_id,
            game_url: game_url.into(),
            game_path: game_path.into(),
            token: token.into(),
        }
    }

    /// Full WebSocket URL: `game_url` joined with `game_path`, with the token
    /// and game id as query parameters.
    pub fn socket_url(&self) -> Result<Url, DomainError> {
        let base = Url::parse(&self.game_url)
            .map_err(|e| DomainError::parse(format!("game url {:?}: {e}", self.game_url)))?;
        match base.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(DomainError::validation(format!(
                    "game url must use ws or wss, got {other}"
                )))
            }
        }

        let mut url = base
            .join(&self.game_path)
            .map_err(|e| DomainError::parse(format!("game path {:?}: {e}", self.game_path)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("game_id", &self.game_id.to_string());
            if !self.token.is_empty() {
                query.append_pair("token", &self.token);
            }
        }
        Ok(url)
    }
}

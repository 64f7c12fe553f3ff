//! Game Connection Port - live feed from a running game.

use aimmo_domain::{ConnectionParameters, WorldSnapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::PortError;

/// Something the game server pushed to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    /// End-of-turn world state.
    WorldUpdate(WorldSnapshot),
    /// Output printed by the avatar's code during the last turn.
    AvatarLog { message: String },
    /// The server is now running the most recently saved code.
    AvatarUpdated,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameConnectionPort: Send + Sync {
    /// Open a connection and return its event feed.
    ///
    /// The feed ends when the server goes away. Dropping the receiver closes
    /// the connection.
    async fn connect(
        &self,
        parameters: &ConnectionParameters,
    ) -> Result<mpsc::Receiver<GameEvent>, PortError>;
}

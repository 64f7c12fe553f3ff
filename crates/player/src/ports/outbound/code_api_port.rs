//! Code API Port - fetch and save an avatar's code.

use aimmo_domain::GameId;
use async_trait::async_trait;

use super::PortError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeApi: Send + Sync {
    /// The code currently stored for the player's avatar in `game_id`.
    async fn fetch_code(&self, game_id: GameId) -> Result<String, PortError>;

    /// Replace the stored code. The game picks it up on a later turn.
    async fn post_code(&self, game_id: GameId, code: &str) -> Result<(), PortError>;
}

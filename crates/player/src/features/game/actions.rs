use aimmo_domain::{ConnectionParameters, WorldSnapshot};
use serde::{Deserialize, Serialize};

use super::AvatarLog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameAction {
    ConnectionParametersReceived { parameters: ConnectionParameters },
    SocketConnectRequest,
    SocketConnected,
    SocketConnectFailure { error: String },
    SocketDisconnectRequest,
    SocketDisconnected { reason: Option<String> },
    GameStateReceived { snapshot: WorldSnapshot },
    AvatarLogsReceived { log: AvatarLog },
    AvatarUpdatePending,
    AvatarUpdated,
}

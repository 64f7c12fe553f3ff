use std::collections::VecDeque;

use aimmo_domain::{ConnectionParameters, WorldSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Progress of getting newly saved code running on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarUpdateStatus {
    #[default]
    Idle,
    /// Code was saved; the server has not confirmed it yet.
    Pending,
    Updated,
}

/// One line of avatar output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarLog {
    /// Turn of the latest snapshot when the line arrived, if any.
    pub turn: Option<u64>,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

/// The game slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameState {
    pub connection_parameters: Option<ConnectionParameters>,
    pub connection: ConnectionStatus,
    /// Latest world snapshot; never replaced by an older turn.
    pub world: Option<WorldSnapshot>,
    /// Most recent avatar output, oldest first, at most
    /// [`GameState::LOG_CAPACITY`] lines.
    pub logs: VecDeque<AvatarLog>,
    pub avatar_update: AvatarUpdateStatus,
    pub last_error: Option<String>,
}

impl GameState {
    pub const LOG_CAPACITY: usize = 100;

    pub fn turn(&self) -> Option<u64> {
        self.world.as_ref().map(WorldSnapshot::turn)
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionStatus::Connected
    }
}

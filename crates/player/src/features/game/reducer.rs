use aimmo_store::Reducer;

use super::{AvatarUpdateStatus, ConnectionStatus, GameAction, GameState};
use crate::action::Action;

/// Maintains [`GameState`]. Ignores every non-game action.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameReducer;

impl Reducer<Action> for GameReducer {
    type State = GameState;

    fn initial_state(&self) -> GameState {
        GameState::default()
    }

    fn reduce(&self, state: &GameState, action: &Action) -> Option<GameState> {
        let Action::Game(action) = action else {
            return None;
        };

        let next = match action {
            GameAction::ConnectionParametersReceived { parameters } => GameState {
                connection_parameters: Some(parameters.clone()),
                ..state.clone()
            },
            GameAction::SocketConnectRequest => match state.connection {
                ConnectionStatus::Disconnected => GameState {
                    connection: ConnectionStatus::Connecting,
                    ..state.clone()
                },
                ConnectionStatus::Connecting | ConnectionStatus::Connected => return None,
            },
            GameAction::SocketConnected => GameState {
                connection: ConnectionStatus::Connected,
                last_error: None,
                ..state.clone()
            },
            GameAction::SocketConnectFailure { error } => GameState {
                connection: ConnectionStatus::Disconnected,
                last_error: Some(error.clone()),
                ..state.clone()
            },
            GameAction::SocketDisconnectRequest => return None,
            GameAction::SocketDisconnected { reason } => GameState {
                connection: ConnectionStatus::Disconnected,
                last_error: reason.clone().or_else(|| state.last_error.clone()),
                ..state.clone()
            },
            GameAction::GameStateReceived { snapshot } => {
                if state.turn().is_some_and(|turn| snapshot.turn() < turn) {
                    tracing::debug!(
                        received = snapshot.turn(),
                        current = ?state.turn(),
                        "Ignoring stale world snapshot"
                    );
                    return None;
                }
                GameState {
                    world: Some(snapshot.clone()),
                    ..state.clone()
                }
            }
            GameAction::AvatarLogsReceived { log } => {
                let mut logs = state.logs.clone();
                if logs.len() >= GameState::LOG_CAPACITY {
                    logs.pop_front();
                }
                logs.push_back(log.clone());
                GameState {
                    logs,
                    ..state.clone()
                }
            }
            GameAction::AvatarUpdatePending => GameState {
                avatar_update: AvatarUpdateStatus::Pending,
                ..state.clone()
            },
            GameAction::AvatarUpdated => GameState {
                avatar_update: AvatarUpdateStatus::Updated,
                ..state.clone()
            },
        };

        (next != *state).then_some(next)
    }
}

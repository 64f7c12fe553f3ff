use std::sync::Arc;

use aimmo_store::{ActionStream, Epic, StateObserver};
use chrono::Utc;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use super::{AvatarLog, GameAction};
use crate::action::Action;
use crate::features::editor::EditorAction;
use crate::features::{EpicDeps, RootState};
use crate::ports::outbound::{GameConnectionPort, GameEvent};

enum Step {
    Action(Option<Action>),
    Event(Option<GameEvent>),
}

/// Owns the live connection to the game.
///
/// `SocketConnectRequest` opens it using the connection parameters in state and
/// emits `SocketConnected` or `SocketConnectFailure`. While open, every game
/// event becomes an action. The connection ends with `SocketDisconnected`,
/// either because the server went away or because `SocketDisconnectRequest`
/// was dispatched. Connect requests while connected are ignored.
pub struct ConnectionEpic {
    port: Arc<dyn GameConnectionPort>,
}

impl ConnectionEpic {
    pub fn new(port: Arc<dyn GameConnectionPort>) -> Self {
        Self { port }
    }
}

fn event_to_action(event: GameEvent, state: &RootState) -> Action {
    let action = match event {
        GameEvent::WorldUpdate(snapshot) => GameAction::GameStateReceived { snapshot },
        GameEvent::AvatarLog { message } => GameAction::AvatarLogsReceived {
            log: AvatarLog {
                turn: state.game.turn(),
                message,
                received_at: Utc::now(),
            },
        },
        GameEvent::AvatarUpdated => GameAction::AvatarUpdated,
    };
    Action::Game(action)
}

impl Epic<Action, RootState> for ConnectionEpic {
    fn name(&self) -> &'static str {
        "game.connection"
    }

    fn run(&self, mut actions: ActionStream<Action>, state: StateObserver<RootState>) -> ActionStream<Action> {
        let port = Arc::clone(&self.port);

        Box::pin(async_stream::stream! {
            let mut events: Option<mpsc::Receiver<GameEvent>> = None;

            loop {
                let step = match events.as_mut() {
                    Some(feed) => tokio::select! {
                        action = actions.next() => Step::Action(action),
                        event = feed.recv() => Step::Event(event),
                    },
                    None => Step::Action(actions.next().await),
                };

                match step {
                    Step::Action(None) => break,
                    Step::Action(Some(Action::Game(GameAction::SocketConnectRequest))) => {
                        if events.is_some() {
                            tracing::debug!("Already connected, ignoring connect request");
                            continue;
                        }

                        let parameters = state.current().game.connection_parameters.clone();
                        let Some(parameters) = parameters else {
                            tracing::warn!("Connect requested before connection parameters arrived");
                            yield Action::Game(GameAction::SocketConnectFailure {
                                error: "no connection parameters".to_string(),
                            });
                            continue;
                        };

                        match port.connect(&parameters).await {
                            Ok(feed) => {
                                tracing::info!(game_id = %parameters.game_id, "Connected to game");
                                events = Some(feed);
                                yield Action::Game(GameAction::SocketConnected);
                            }
                            Err(e) => {
                                tracing::warn!(game_id = %parameters.game_id, error = %e, "Failed to connect to game");
                                yield Action::Game(GameAction::SocketConnectFailure {
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                    Step::Action(Some(Action::Game(GameAction::SocketDisconnectRequest))) => {
                        if events.take().is_some() {
                            tracing::info!("Disconnected from game on request");
                            yield Action::Game(GameAction::SocketDisconnected { reason: None });
                        }
                    }
                    Step::Action(Some(_)) => {}
                    Step::Event(Some(event)) => {
                        let action = event_to_action(event, &state.current());
                        yield action;
                    }
                    Step::Event(None) => {
                        events = None;
                        tracing::warn!("Game connection closed by server");
                        yield Action::Game(GameAction::SocketDisconnected {
                            reason: Some("connection closed by game server".to_string()),
                        });
                    }
                }
            }
        })
    }
}

/// Saving code in the editor means the avatar is about to change: announces
/// that to the game slice as `AvatarUpdatePending`.
pub struct AvatarUpdateFeedbackEpic;

impl Epic<Action, RootState> for AvatarUpdateFeedbackEpic {
    fn name(&self) -> &'static str {
        "game.avatar_update_feedback"
    }

    fn run(&self, actions: ActionStream<Action>, _state: StateObserver<RootState>) -> ActionStream<Action> {
        Box::pin(actions.filter_map(|action| async move {
            matches!(action, Action::Editor(EditorAction::PostCodeSuccess { .. }))
                .then_some(Action::Game(GameAction::AvatarUpdatePending))
        }))
    }
}

/// Game epics, in registration order.
pub fn game_epics(deps: &EpicDeps) -> Vec<Box<dyn Epic<Action, RootState>>> {
    vec![
        Box::new(ConnectionEpic::new(Arc::clone(&deps.game_connection))),
        Box::new(AvatarUpdateFeedbackEpic),
    ]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aimmo_domain::{Cell, ConnectionParameters, GameId, WorldSnapshot};
    use aimmo_store::{combine_epics, Store, StoreConfig};

    use super::*;
    use crate::features::game::{AvatarUpdateStatus, ConnectionStatus};
    use crate::features::{root_reducer, PlayerStore};
    use crate::ports::outbound::{MockGameConnectionPort, PortError};

    fn parameters() -> ConnectionParameters {
        ConnectionParameters::new(GameId::new(3), "ws://localhost:5000", "/game-3/socket.io", "")
    }

    fn store_with(port: MockGameConnectionPort) -> PlayerStore {
        let mut store = Store::new(root_reducer(), StoreConfig::default());
        store
            .start(combine_epics([
                Box::new(ConnectionEpic::new(Arc::new(port))) as Box<dyn Epic<Action, RootState>>,
                Box::new(AvatarUpdateFeedbackEpic),
            ]))
            .unwrap();
        store
    }

    /// Dispatch the next epic action back into the store and return it.
    async fn pump(store: &mut PlayerStore) -> Action {
        let action = tokio::time::timeout(Duration::from_secs(1), store.next_epic_action())
            .await
            .expect("epic emitted in time")
            .unwrap()
            .expect("epics still running");
        store.dispatch(action.clone());
        action
    }

    #[tokio::test]
    async fn connect_without_parameters_fails() {
        let mut port = MockGameConnectionPort::new();
        port.expect_connect().never();
        let mut store = store_with(port);

        store.dispatch(GameAction::SocketConnectRequest.into());

        assert_eq!(
            pump(&mut store).await,
            Action::Game(GameAction::SocketConnectFailure {
                error: "no connection parameters".into()
            })
        );
        assert_eq!(store.state().game.connection, ConnectionStatus::Disconnected);
        store.shutdown().await;
    }

    #[tokio::test]
    async fn forwards_game_events_until_the_server_closes() {
        let (tx, rx) = mpsc::channel(8);
        let mut port = MockGameConnectionPort::new();
        port.expect_connect()
            .withf(|p| p.game_id == GameId::new(3))
            .times(1)
            .return_once(move |_| Ok(rx));
        let mut store = store_with(port);

        store.dispatch(
            GameAction::ConnectionParametersReceived {
                parameters: parameters(),
            }
            .into(),
        );
        store.dispatch(GameAction::SocketConnectRequest.into());
        assert_eq!(pump(&mut store).await, Action::Game(GameAction::SocketConnected));
        assert!(store.state().game.is_connected());

        // A second request while connected is ignored.
        store.dispatch(GameAction::SocketConnectRequest.into());

        let snapshot = WorldSnapshot::from_fn(1, 1, 1, Cell::open).unwrap();
        tx.send(GameEvent::WorldUpdate(snapshot.clone())).await.unwrap();
        tx.send(GameEvent::AvatarLog {
            message: "moved north".into(),
        })
        .await
        .unwrap();
        drop(tx);

        assert_eq!(
            pump(&mut store).await,
            Action::Game(GameAction::GameStateReceived { snapshot })
        );
        match pump(&mut store).await {
            Action::Game(GameAction::AvatarLogsReceived { log }) => {
                assert_eq!(log.message, "moved north");
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert!(matches!(
            pump(&mut store).await,
            Action::Game(GameAction::SocketDisconnected { reason: Some(_) })
        ));

        let game = &store.state().game;
        assert_eq!(game.connection, ConnectionStatus::Disconnected);
        assert_eq!(game.turn(), Some(1));
        assert_eq!(game.logs.len(), 1);
        store.shutdown().await;
    }

    #[tokio::test]
    async fn disconnect_request_closes_the_feed() {
        let (tx, rx) = mpsc::channel(8);
        let mut port = MockGameConnectionPort::new();
        port.expect_connect().return_once(move |_| Ok(rx));
        let mut store = store_with(port);

        store.dispatch(
            GameAction::ConnectionParametersReceived {
                parameters: parameters(),
            }
            .into(),
        );
        store.dispatch(GameAction::SocketConnectRequest.into());
        assert_eq!(pump(&mut store).await, Action::Game(GameAction::SocketConnected));

        store.dispatch(GameAction::SocketDisconnectRequest.into());
        assert_eq!(
            pump(&mut store).await,
            Action::Game(GameAction::SocketDisconnected { reason: None })
        );

        // The epic dropped its receiver.
        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .expect("feed closed");
        store.shutdown().await;
    }

    #[tokio::test]
    async fn connect_errors_become_failure_actions() {
        let mut port = MockGameConnectionPort::new();
        port.expect_connect()
            .return_once(|_| Err(PortError::connection("refused")));
        let mut store = store_with(port);

        store.dispatch(
            GameAction::ConnectionParametersReceived {
                parameters: parameters(),
            }
            .into(),
        );
        store.dispatch(GameAction::SocketConnectRequest.into());

        assert_eq!(
            pump(&mut store).await,
            Action::Game(GameAction::SocketConnectFailure {
                error: "Connection error: refused".into()
            })
        );
        assert_eq!(
            store.state().game.last_error.as_deref(),
            Some("Connection error: refused")
        );
        store.shutdown().await;
    }

    #[tokio::test]
    async fn saved_code_marks_avatar_update_pending() {
        let mut store = store_with(MockGameConnectionPort::new());

        store.dispatch(
            EditorAction::PostCodeSuccess {
                code: "saved".into(),
            }
            .into(),
        );

        assert_eq!(
            pump(&mut store).await,
            Action::Game(GameAction::AvatarUpdatePending)
        );
        assert_eq!(store.state().game.avatar_update, AvatarUpdateStatus::Pending);
        store.shutdown().await;
    }
}

//! Headless player: boots the store, feeds it until cancelled, tears it down.

use std::sync::Arc;

use aimmo_domain::ConnectionParameters;
use aimmo_store::StoreError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::PlayerConfig;
use crate::features::editor::EditorAction;
use crate::features::game::GameAction;
use crate::features::{root_epic, root_reducer, EpicDeps, PlayerStore, RootState};

pub struct Runner {
    store: PlayerStore,
    connection: ConnectionParameters,
}

impl Runner {
    /// Build the store and start every epic. Nothing is dispatched yet.
    pub fn new(config: &PlayerConfig, deps: &EpicDeps) -> Result<Self, StoreError> {
        let mut store = PlayerStore::new(root_reducer(), config.store_config());
        store.start(root_epic(deps))?;
        Ok(Self {
            store,
            connection: config.connection.clone(),
        })
    }

    pub fn state(&self) -> Arc<RootState> {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.store.subscribe()
    }

    /// Fetch the avatar's code, connect to the game and keep dispatching epic
    /// output until `cancel` fires. Returns the final state.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<Arc<RootState>, StoreError> {
        let logger = tokio::spawn(log_transitions(self.store.subscribe()));

        self.store.dispatch(
            GameAction::ConnectionParametersReceived {
                parameters: self.connection.clone(),
            }
            .into(),
        );
        self.store.dispatch(EditorAction::GetCodeRequest.into());
        self.store.dispatch(GameAction::SocketConnectRequest.into());

        let result = self.store.run_until(cancel).await;

        tracing::info!("Shutting down player");
        self.store.shutdown().await;
        let state = self.store.state();
        drop(self.store);

        if let Err(e) = logger.await {
            tracing::warn!(error = %e, "State logger did not complete");
        }
        result.map(|()| state)
    }
}

/// Log what changed in each slice. A slice whose `Arc` is unchanged is skipped.
async fn log_transitions(mut changes: watch::Receiver<Arc<RootState>>) {
    let mut previous = Arc::clone(&changes.borrow_and_update());

    while changes.changed().await.is_ok() {
        let current = Arc::clone(&changes.borrow_and_update());

        if !Arc::ptr_eq(&previous.editor, &current.editor) {
            let (before, after) = (&previous.editor, &current.editor);
            tracing::debug!(
                status = ?after.status,
                unsaved = after.has_unsaved_changes(),
                "Editor changed"
            );
            if after.last_error != before.last_error {
                if let Some(error) = &after.last_error {
                    tracing::warn!(%error, "Editor error");
                }
            }
        }

        if !Arc::ptr_eq(&previous.game, &current.game) {
            let (before, after) = (&previous.game, &current.game);
            if after.connection != before.connection {
                tracing::info!(connection = ?after.connection, "Game connection changed");
            }
            if after.turn() != before.turn() {
                tracing::debug!(turn = ?after.turn(), "World updated");
            }
            if after.avatar_update != before.avatar_update {
                tracing::info!(avatar_update = ?after.avatar_update, "Avatar update status changed");
            }
            if after.logs.back() != before.logs.back() {
                if let Some(log) = after.logs.back() {
                    tracing::info!(turn = ?log.turn, message = %log.message, "Avatar log");
                }
            }
            if after.last_error != before.last_error {
                if let Some(error) = &after.last_error {
                    tracing::warn!(%error, "Game error");
                }
            }
        }

        previous = current;
    }
}

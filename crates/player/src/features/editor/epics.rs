use std::sync::Arc;

use aimmo_domain::GameId;
use aimmo_store::{ActionStream, Epic, StateObserver};
use futures_util::StreamExt;

use super::EditorAction;
use crate::action::Action;
use crate::features::{EpicDeps, RootState};
use crate::ports::outbound::CodeApi;

/// The game whose code is being edited: the connected game if known, else the
/// configured default.
fn target_game(state: &RootState, fallback: GameId) -> GameId {
    state
        .game
        .connection_parameters
        .as_ref()
        .map_or(fallback, |parameters| parameters.game_id)
}

/// `GetCodeRequest` → `GetCodeSuccess` | `GetCodeFailure`.
///
/// Requests are handled one at a time, in order: a fetch that hangs delays
/// every request queued behind it.
pub struct GetCodeEpic {
    api: Arc<dyn CodeApi>,
    default_game: GameId,
}

impl GetCodeEpic {
    pub fn new(api: Arc<dyn CodeApi>, default_game: GameId) -> Self {
        Self { api, default_game }
    }
}

impl Epic<Action, RootState> for GetCodeEpic {
    fn name(&self) -> &'static str {
        "editor.get_code"
    }

    fn run(&self, mut actions: ActionStream<Action>, state: StateObserver<RootState>) -> ActionStream<Action> {
        let api = Arc::clone(&self.api);
        let default_game = self.default_game;

        Box::pin(async_stream::stream! {
            while let Some(action) = actions.next().await {
                if action != Action::Editor(EditorAction::GetCodeRequest) {
                    continue;
                }

                let game_id = target_game(&state.current(), default_game);
                match api.fetch_code(game_id).await {
                    Ok(code) => {
                        tracing::debug!(%game_id, bytes = code.len(), "Fetched avatar code");
                        yield Action::Editor(EditorAction::GetCodeSuccess { code });
                    }
                    Err(e) => {
                        tracing::warn!(%game_id, error = %e, "Failed to fetch avatar code");
                        yield Action::Editor(EditorAction::GetCodeFailure { error: e.to_string() });
                    }
                }
            }
        })
    }
}

/// `PostCodeRequest` → `PostCodeSuccess` | `PostCodeFailure`, saving the code
/// in the editor at the time the request is handled. The success carries that
/// code, so edits made while the request is in flight stay unsaved.
pub struct PostCodeEpic {
    api: Arc<dyn CodeApi>,
    default_game: GameId,
}

impl PostCodeEpic {
    pub fn new(api: Arc<dyn CodeApi>, default_game: GameId) -> Self {
        Self { api, default_game }
    }
}

impl Epic<Action, RootState> for PostCodeEpic {
    fn name(&self) -> &'static str {
        "editor.post_code"
    }

    fn run(&self, mut actions: ActionStream<Action>, state: StateObserver<RootState>) -> ActionStream<Action> {
        let api = Arc::clone(&self.api);
        let default_game = self.default_game;

        Box::pin(async_stream::stream! {
            while let Some(action) = actions.next().await {
                if action != Action::Editor(EditorAction::PostCodeRequest) {
                    continue;
                }

                let current = state.current();
                let game_id = target_game(&current, default_game);
                let code = current.editor.code.clone();
                match api.post_code(game_id, &code).await {
                    Ok(()) => {
                        tracing::info!(%game_id, "Saved avatar code");
                        yield Action::Editor(EditorAction::PostCodeSuccess { code });
                    }
                    Err(e) => {
                        tracing::warn!(%game_id, error = %e, "Failed to save avatar code");
                        yield Action::Editor(EditorAction::PostCodeFailure { error: e.to_string() });
                    }
                }
            }
        })
    }
}

/// Editor epics, in registration order.
pub fn editor_epics(deps: &EpicDeps) -> Vec<Box<dyn Epic<Action, RootState>>> {
    vec![
        Box::new(GetCodeEpic::new(Arc::clone(&deps.code_api), deps.default_game)),
        Box::new(PostCodeEpic::new(Arc::clone(&deps.code_api), deps.default_game)),
    ]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aimmo_domain::ConnectionParameters;
    use aimmo_store::{combine_epics, Store, StoreConfig};

    use super::*;
    use crate::features::game::GameAction;
    use crate::features::{root_reducer, PlayerStore};
    use crate::ports::outbound::{MockCodeApi, PortError};

    fn store_with(api: MockCodeApi) -> PlayerStore {
        let api: Arc<dyn CodeApi> = Arc::new(api);
        let mut store = Store::new(root_reducer(), StoreConfig::default());
        store
            .start(combine_epics([
                Box::new(GetCodeEpic::new(Arc::clone(&api), GameId::new(1)))
                    as Box<dyn Epic<Action, RootState>>,
                Box::new(PostCodeEpic::new(api, GameId::new(1))),
            ]))
            .unwrap();
        store
    }

    async fn next(store: &mut PlayerStore) -> Action {
        tokio::time::timeout(Duration::from_secs(1), store.next_epic_action())
            .await
            .expect("epic emitted in time")
            .unwrap()
            .expect("epics still running")
    }

    #[tokio::test]
    async fn get_code_uses_the_connected_game() {
        let mut api = MockCodeApi::new();
        api.expect_fetch_code()
            .withf(|game_id| *game_id == GameId::new(7))
            .times(1)
            .returning(|_| Ok("print('hello')".to_string()));
        let mut store = store_with(api);

        store.dispatch(
            GameAction::ConnectionParametersReceived {
                parameters: ConnectionParameters::new(GameId::new(7), "ws://game", "/s", ""),
            }
            .into(),
        );
        store.dispatch(EditorAction::GetCodeRequest.into());

        let action = next(&mut store).await;
        assert_eq!(
            action,
            Action::Editor(EditorAction::GetCodeSuccess {
                code: "print('hello')".into()
            })
        );
        store.shutdown().await;
    }

    #[tokio::test]
    async fn get_code_failure_becomes_an_action() {
        let mut api = MockCodeApi::new();
        api.expect_fetch_code()
            .withf(|game_id| *game_id == GameId::new(1))
            .returning(|game_id| Err(PortError::not_found("Code", game_id)));
        let mut store = store_with(api);

        store.dispatch(EditorAction::GetCodeRequest.into());

        let action = next(&mut store).await;
        assert_eq!(
            action,
            Action::Editor(EditorAction::GetCodeFailure {
                error: "Code not found: 1".into()
            })
        );
        store.shutdown().await;
    }

    #[tokio::test]
    async fn post_code_saves_the_edited_code() {
        let mut api = MockCodeApi::new();
        api.expect_post_code()
            .withf(|game_id, code| *game_id == GameId::new(1) && code == "attack()")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut store = store_with(api);

        store.dispatch(EditorAction::ChangeCode { code: "attack()".into() }.into());
        store.dispatch(EditorAction::PostCodeRequest.into());

        let action = next(&mut store).await;
        assert_eq!(
            action,
            Action::Editor(EditorAction::PostCodeSuccess {
                code: "attack()".into()
            })
        );

        store.dispatch(action);
        assert!(!store.state().editor.has_unsaved_changes());
        store.shutdown().await;
    }
}

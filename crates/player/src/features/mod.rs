//! Feature slices and their composition into the player's root reducer and
//! root epic.

pub mod editor;
pub mod game;

use std::sync::Arc;

use aimmo_domain::GameId;
use aimmo_store::{combine_epics, combine_reducers, RootEpic, Store};

use crate::action::Action;
use crate::ports::outbound::{CodeApi, GameConnectionPort};
use editor::{editor_epics, EditorReducer};
use game::{game_epics, GameReducer};

combine_reducers! {
    /// Whole player state: one field per feature slice.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RootState;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct RootReducer for Action {
        editor: EditorReducer,
        game: GameReducer,
    }
}

pub type PlayerStore = Store<RootReducer, Action>;

pub fn root_reducer() -> RootReducer {
    RootReducer::new(EditorReducer, GameReducer)
}

/// What epics need from the outside world.
#[derive(Clone)]
pub struct EpicDeps {
    pub code_api: Arc<dyn CodeApi>,
    pub game_connection: Arc<dyn GameConnectionPort>,
    /// Used by the editor until connection parameters arrive.
    pub default_game: GameId,
}

/// Every feature epic, editor first.
pub fn root_epic(deps: &EpicDeps) -> RootEpic<Action, RootState> {
    combine_epics(editor_epics(deps).into_iter().chain(game_epics(deps)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aimmo_domain::{Cell, WorldSnapshot};
    use aimmo_store::{apply, Reducer, StoreConfig};

    use super::*;
    use crate::features::editor::{EditorAction, EditorState};
    use crate::features::game::{GameAction, GameState};
    use crate::ports::outbound::{MockCodeApi, MockGameConnectionPort};

    fn initial() -> Arc<RootState> {
        Arc::new(root_reducer().initial_state())
    }

    #[test]
    fn initial_state_holds_each_slice_initial_state() {
        let state = initial();
        assert_eq!(*state.editor, EditorState::default());
        assert_eq!(*state.game, GameState::default());
    }

    #[test]
    fn each_slice_sees_only_its_own_actions() {
        let state = initial();
        let next = apply(
            &root_reducer(),
            &state,
            &EditorAction::ChangeCode {
                code: "move(NORTH)".into(),
            }
            .into(),
        );

        assert!(!Arc::ptr_eq(&state, &next));
        assert_eq!(next.editor.code, "move(NORTH)");
        // The untouched slice is the very same allocation.
        assert!(Arc::ptr_eq(&state.game, &next.game));

        let snapshot = WorldSnapshot::from_fn(1, 1, 1, Cell::open).unwrap();
        let after = apply(
            &root_reducer(),
            &next,
            &GameAction::GameStateReceived { snapshot }.into(),
        );
        assert!(Arc::ptr_eq(&next.editor, &after.editor));
        assert!(!Arc::ptr_eq(&next.game, &after.game));
    }

    #[test]
    fn unchanged_slices_keep_the_root_state() {
        let state = initial();
        // Disconnect requests are handled by the connection epic only.
        let next = apply(&root_reducer(), &state, &GameAction::SocketDisconnectRequest.into());
        assert!(Arc::ptr_eq(&state, &next));
        assert!(root_reducer()
            .reduce(&state, &GameAction::SocketDisconnectRequest.into())
            .is_none());
    }

    #[test]
    fn root_reducer_matches_slice_reducers() {
        let state = initial();
        let action: Action = EditorAction::GetCodeRequest.into();
        let next = root_reducer().reduce(&state, &action).unwrap();
        assert_eq!(
            Some(next.editor.as_ref().clone()),
            EditorReducer.reduce(&state.editor, &action)
        );
        assert_eq!(GameReducer.reduce(&state.game, &action), None);
    }

    #[test]
    fn root_epic_registers_every_feature_epic() {
        let deps = EpicDeps {
            code_api: Arc::new(MockCodeApi::new()),
            game_connection: Arc::new(MockGameConnectionPort::new()),
            default_game: GameId::new(1),
        };
        let root = root_epic(&deps);
        assert_eq!(
            root.names(),
            vec![
                "editor.get_code",
                "editor.post_code",
                "game.connection",
                "game.avatar_update_feedback",
            ]
        );
    }

    #[tokio::test]
    async fn store_starts_with_root_state() {
        let store = PlayerStore::new(root_reducer(), StoreConfig::default());
        assert_eq!(*store.state(), root_reducer().initial_state());
    }
}

//! The action vocabulary shared by every reducer and epic.

use serde::{Deserialize, Serialize};

use crate::features::editor::EditorAction;
use crate::features::game::GameAction;

/// Everything that can be dispatched to the store.
///
/// Each feature owns one variant. Reducers match only their own feature's
/// variant and treat the rest as no-ops; an epic may emit another feature's
/// action when it needs to reach across slices.
///
/// Serialized as `{"slice": "editor", "action": {"type": "GET_CODE_REQUEST"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "snake_case")]
pub enum Action {
    Editor(EditorAction),
    Game(GameAction),
}

impl From<EditorAction> for Action {
    fn from(action: EditorAction) -> Self {
        Self::Editor(action)
    }
}

impl From<GameAction> for Action {
    fn from(action: GameAction) -> Self {
        Self::Game(action)
    }
}

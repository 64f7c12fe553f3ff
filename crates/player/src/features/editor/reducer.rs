use aimmo_store::Reducer;

use super::{EditorAction, EditorState, EditorStatus};
use crate::action::Action;

/// Maintains [`EditorState`]. Ignores every non-editor action.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorReducer;

impl Reducer<Action> for EditorReducer {
    type State = EditorState;

    fn initial_state(&self) -> EditorState {
        EditorState::default()
    }

    fn reduce(&self, state: &EditorState, action: &Action) -> Option<EditorState> {
        let Action::Editor(action) = action else {
            return None;
        };

        let next = match action {
            EditorAction::GetCodeRequest => EditorState {
                status: EditorStatus::Fetching,
                last_error: None,
                ..state.clone()
            },
            EditorAction::GetCodeSuccess { code } => EditorState {
                code: code.clone(),
                code_on_server: code.clone(),
                status: EditorStatus::Idle,
                last_error: None,
            },
            EditorAction::GetCodeFailure { error } | EditorAction::PostCodeFailure { error } => {
                EditorState {
                    status: EditorStatus::Idle,
                    last_error: Some(error.clone()),
                    ..state.clone()
                }
            }
            EditorAction::ChangeCode { code } => EditorState {
                code: code.clone(),
                ..state.clone()
            },
            EditorAction::ResetCode => EditorState {
                code: state.code_on_server.clone(),
                ..state.clone()
            },
            EditorAction::PostCodeRequest => EditorState {
                status: EditorStatus::Saving,
                last_error: None,
                ..state.clone()
            },
            EditorAction::PostCodeSuccess { code } => EditorState {
                code_on_server: code.clone(),
                status: EditorStatus::Idle,
                ..state.clone()
            },
        };

        (next != *state).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::game::GameAction;

    fn reduce(state: &EditorState, action: impl Into<Action>) -> Option<EditorState> {
        EditorReducer.reduce(state, &action.into())
    }

    fn loaded(code: &str) -> EditorState {
        EditorState {
            code: code.into(),
            code_on_server: code.into(),
            ..EditorState::default()
        }
    }

    #[test]
    fn fetch_round_trip() {
        let state = EditorState {
            last_error: Some("earlier failure".into()),
            ..EditorState::default()
        };

        let fetching = reduce(&state, EditorAction::GetCodeRequest).unwrap();
        assert_eq!(fetching.status, EditorStatus::Fetching);
        assert_eq!(fetching.last_error, None);

        let done = reduce(
            &fetching,
            EditorAction::GetCodeSuccess {
                code: "move()".into(),
            },
        )
        .unwrap();
        assert_eq!(done, loaded("move()"));
        assert!(!done.has_unsaved_changes());
    }

    #[test]
    fn failures_record_the_error() {
        let state = EditorState {
            status: EditorStatus::Saving,
            ..loaded("a")
        };
        let failed = reduce(
            &state,
            EditorAction::PostCodeFailure {
                error: "502".into(),
            },
        )
        .unwrap();
        assert_eq!(failed.status, EditorStatus::Idle);
        assert_eq!(failed.last_error.as_deref(), Some("502"));
        assert_eq!(failed.code, "a");
    }

    #[test]
    fn editing_and_saving() {
        let edited = reduce(&loaded("a"), EditorAction::ChangeCode { code: "b".into() }).unwrap();
        assert!(edited.has_unsaved_changes());

        let saving = reduce(&edited, EditorAction::PostCodeRequest).unwrap();
        assert_eq!(saving.status, EditorStatus::Saving);

        let saved = reduce(&saving, EditorAction::PostCodeSuccess { code: "b".into() }).unwrap();
        assert_eq!(saved, loaded("b"));
    }

    #[test]
    fn edits_made_while_saving_stay_unsaved() {
        let mut state = EditorState::default();
        for action in [
            EditorAction::ChangeCode {
                code: "posted".into(),
            },
            EditorAction::PostCodeRequest,
            EditorAction::ChangeCode {
                code: "posted + unsaved edit".into(),
            },
            EditorAction::PostCodeSuccess {
                code: "posted".into(),
            },
        ] {
            state = reduce(&state, action).unwrap_or(state);
        }

        assert_eq!(state.code_on_server, "posted");
        assert_eq!(state.code, "posted + unsaved edit");
        assert!(state.has_unsaved_changes());
        assert_eq!(state.status, EditorStatus::Idle);
    }

    #[test]
    fn reset_restores_server_code() {
        let edited = EditorState {
            code: "changed".into(),
            ..loaded("original")
        };
        let reset = reduce(&edited, EditorAction::ResetCode).unwrap();
        assert_eq!(reset.code, "original");
    }

    #[test]
    fn redundant_actions_are_no_ops() {
        let state = loaded("same");
        assert!(reduce(&state, EditorAction::ChangeCode { code: "same".into() }).is_none());
        assert!(reduce(&state, EditorAction::ResetCode).is_none());

        let fetching = EditorState {
            status: EditorStatus::Fetching,
            ..state
        };
        assert!(reduce(&fetching, EditorAction::GetCodeRequest).is_none());
    }

    #[test]
    fn game_actions_are_ignored() {
        let state = loaded("x");
        assert!(reduce(&state, GameAction::SocketConnectRequest).is_none());
        assert!(reduce(&state, GameAction::AvatarUpdated).is_none());
    }
}

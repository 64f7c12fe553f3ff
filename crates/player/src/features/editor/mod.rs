//! Editor feature: the avatar code being edited and its round trips to the
//! code API.

mod actions;
mod epics;
mod reducer;
mod state;

pub use actions::EditorAction;
pub use epics::{editor_epics, GetCodeEpic, PostCodeEpic};
pub use reducer::EditorReducer;
pub use state::{EditorState, EditorStatus};

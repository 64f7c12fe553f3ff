//! Game feature: the connection to a running game and what it tells us.

mod actions;
mod epics;
mod reducer;
mod state;

pub use actions::GameAction;
pub use epics::{game_epics, AvatarUpdateFeedbackEpic, ConnectionEpic};
pub use reducer::GameReducer;
pub use state::{AvatarLog, AvatarUpdateStatus, ConnectionStatus, GameState};

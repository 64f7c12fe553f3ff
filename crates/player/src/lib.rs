//! AIMMO Player crate.
//!
//! The editor and game features, composed into one store: actions, slice
//! reducers and epics, the ports epics talk through, their adapters and the
//! headless runner.

pub mod action;
pub mod config;
pub mod features;
pub mod infrastructure;
pub mod ports;
pub mod runner;

pub use action::Action;
pub use features::{root_epic, root_reducer, EpicDeps, PlayerStore, RootReducer, RootState};

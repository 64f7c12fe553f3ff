//! Redux-style state management on tokio.
//!
//! - [`Reducer`] / [`combine_reducers!`]: synchronous state transitions,
//!   composed into one record keyed by slice name.
//! - [`Epic`] / [`combine_epics`]: asynchronous side-effect processors, each
//!   running as its own task over a shared broadcast of dispatched actions.
//! - [`Store`]: owns the state, applies the root reducer, runs the root epic.

pub mod epic;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

pub use epic::{combine_epics, ActionStream, Epic, RootEpic, StateObserver};
pub use error::StoreError;
pub use middleware::EpicMiddleware;
pub use reducer::{apply, FnReducer, Reducer};
pub use store::{Store, StoreConfig};

//! Error types for store lifecycle operations.

/// Errors raised by [`Store`](crate::Store) lifecycle calls.
///
/// Reducers and epics never produce these: an unrecognised action is a no-op
/// and epic failures are reported as actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// `start` was called while epics are already running.
    #[error("epics are already running")]
    AlreadyStarted,

    /// An operation needing running epics was called before `start`.
    #[error("epics have not been started")]
    NotStarted,
}

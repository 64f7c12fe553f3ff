//! The store: single owner of application state.
//!
//! State changes only through [`Store::dispatch`], which takes `&mut self`, so
//! reducer runs are serialised by construction. Epics run as separate tasks
//! and feed their actions back through [`Store::run_until`].

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::epic::RootEpic;
use crate::error::StoreError;
use crate::middleware::EpicMiddleware;
use crate::reducer::{apply, Reducer};

/// Tunables for a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many dispatched actions each epic may fall behind before it starts
    /// missing them.
    pub action_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { action_buffer: 256 }
    }
}

struct RunningEpics<A> {
    middleware: EpicMiddleware<A>,
    output: mpsc::UnboundedReceiver<A>,
}

pub struct Store<R, A>
where
    R: Reducer<A>,
{
    reducer: R,
    state: Arc<R::State>,
    state_tx: watch::Sender<Arc<R::State>>,
    epics: Option<RunningEpics<A>>,
    config: StoreConfig,
}

impl<R, A> Store<R, A>
where
    R: Reducer<A>,
    A: Clone + fmt::Debug + Send + 'static,
{
    /// Create a store holding the reducer's initial state.
    pub fn new(reducer: R, config: StoreConfig) -> Self {
        let state = reducer.initial_state();
        Self::with_state(reducer, state, config)
    }

    /// Create a store resuming from previously captured state.
    pub fn with_state(reducer: R, state: R::State, config: StoreConfig) -> Self {
        let state = Arc::new(state);
        let (state_tx, _) = watch::channel(Arc::clone(&state));
        Self {
            reducer,
            state,
            state_tx,
            epics: None,
            config,
        }
    }

    pub fn state(&self) -> Arc<R::State> {
        Arc::clone(&self.state)
    }

    /// Watch state changes. Only actions that changed state are published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<R::State>> {
        self.state_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.epics.is_some()
    }

    /// Run the reducer for `action`, then hand the action to the epics.
    ///
    /// Returns whether the state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        let next = apply(&self.reducer, &self.state, &action);
        let changed = !Arc::ptr_eq(&next, &self.state);
        tracing::debug!(?action, changed, "Dispatch");

        if changed {
            self.state = next;
            self.state_tx.send_replace(Arc::clone(&self.state));
        }

        if let Some(epics) = &self.epics {
            epics.middleware.publish(action);
        }
        changed
    }

    /// Start the epics. Each one sees every action dispatched from now on.
    pub fn start(&mut self, root: RootEpic<A, R::State>) -> Result<(), StoreError> {
        if self.epics.is_some() {
            return Err(StoreError::AlreadyStarted);
        }
        tracing::info!(epics = ?root.names(), "Starting epics");
        let (middleware, output) =
            EpicMiddleware::spawn(root, self.state_tx.subscribe(), self.config.action_buffer);
        self.epics = Some(RunningEpics { middleware, output });
        Ok(())
    }

    /// Wait for the next action emitted by any epic, without dispatching it.
    ///
    /// Returns `None` once every epic has finished.
    pub async fn next_epic_action(&mut self) -> Result<Option<A>, StoreError> {
        let epics = self.epics.as_mut().ok_or(StoreError::NotStarted)?;
        Ok(epics.output.recv().await)
    }

    /// Dispatch epic output until `cancel` fires or every epic has finished.
    pub async fn run_until(&mut self, cancel: CancellationToken) -> Result<(), StoreError> {
        loop {
            let next = {
                let epics = self.epics.as_mut().ok_or(StoreError::NotStarted)?;
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(()),
                    next = epics.output.recv() => next,
                }
            };

            match next {
                Some(action) => {
                    self.dispatch(action);
                }
                None => {
                    tracing::info!("All epics finished");
                    return Ok(());
                }
            }
        }
    }

    /// Stop the epics and wait for them. State is kept; the store can be
    /// started again.
    pub async fn shutdown(&mut self) {
        if let Some(RunningEpics { middleware, output }) = self.epics.take() {
            middleware.shutdown().await;
            drop(output);
        }
    }
}

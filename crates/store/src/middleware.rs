//! Runs a [`RootEpic`]: one tokio task per epic, all fed from one broadcast
//! channel and all feeding one output channel.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::epic::{subscription_stream, ActionStream, RootEpic, StateObserver};

struct EpicTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Live epics of one store.
///
/// Dropping the middleware without calling [`shutdown`](Self::shutdown) still
/// cancels every epic, but does not wait for them to finish.
pub struct EpicMiddleware<A> {
    actions: broadcast::Sender<A>,
    cancel: CancellationToken,
    tasks: Vec<EpicTask>,
}

impl<A> EpicMiddleware<A>
where
    A: Clone + Send + 'static,
{
    /// Subscribe every epic to a fresh action channel and spawn it.
    ///
    /// Subscriptions are taken before any task runs, so no action published
    /// after `spawn` returns can be missed. Returns the middleware and the
    /// receiving end of the merged output.
    pub fn spawn<S>(
        root: RootEpic<A, S>,
        state: watch::Receiver<Arc<S>>,
        capacity: usize,
    ) -> (Self, mpsc::UnboundedReceiver<A>)
    where
        S: Send + Sync + 'static,
    {
        let (actions, _) = broadcast::channel(capacity.max(1));
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let tasks = root
            .into_epics()
            .into_iter()
            .map(|epic| {
                let name = epic.name();
                let input = subscription_stream(actions.subscribe(), name);
                let output = epic.run(input, StateObserver::new(state.clone()));
                let handle = tokio::spawn(drive_epic(
                    name,
                    output,
                    output_tx.clone(),
                    cancel.child_token(),
                ));
                EpicTask { name, handle }
            })
            .collect::<Vec<_>>();

        tracing::info!(epics = tasks.len(), "Epics started");

        (
            Self {
                actions,
                cancel,
                tasks,
            },
            output_rx,
        )
    }

    /// Deliver a dispatched action to every epic still listening.
    pub fn publish(&self, action: A) {
        // An error only means every epic has already finished.
        let _ = self.actions.send(action);
    }

    pub fn epic_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel every epic and wait for their tasks to end.
    ///
    /// A panicked epic is reported here; it never affected the others.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            match task.handle.await {
                Ok(()) => {}
                Err(e) if e.is_panic() => {
                    tracing::error!(epic = task.name, "Epic panicked");
                }
                Err(e) => {
                    tracing::warn!(epic = task.name, error = %e, "Epic task did not complete");
                }
            }
        }
        tracing::info!("Epics stopped");
    }
}

impl<A> Drop for EpicMiddleware<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn drive_epic<A>(
    name: &'static str,
    mut output: ActionStream<A>,
    tx: mpsc::UnboundedSender<A>,
    cancel: CancellationToken,
) where
    A: Send + 'static,
{
    tracing::debug!(epic = name, "Epic running");
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(epic = name, "Epic cancelled");
                break;
            }
            next = output.next() => next,
        };

        match next {
            Some(action) => {
                if tx.send(action).is_err() {
                    tracing::debug!(epic = name, "Epic output closed");
                    break;
                }
            }
            None => {
                tracing::debug!(epic = name, "Epic stream completed");
                break;
            }
        }
    }
}

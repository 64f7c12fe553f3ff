//! Epics: long-running processes that turn dispatched actions into more
//! actions.
//!
//! An epic receives its own subscription to the stream of dispatched actions
//! plus a read-only view of the current state, and returns the stream of
//! actions it wants dispatched. Epics never touch state directly; anything they
//! learn from the outside world comes back through the reducers as an action.

use std::sync::Arc;

use futures_util::stream::{self, BoxStream};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;

/// A stream of actions, either consumed by an epic or produced by one.
pub type ActionStream<A> = BoxStream<'static, A>;

/// An independent side-effect processor.
pub trait Epic<A, S>: Send + Sync + 'static {
    /// Unique name, used in logs.
    fn name(&self) -> &'static str;

    /// Build the epic's output stream.
    ///
    /// `actions` yields every action dispatched after the epic was started,
    /// after reducers have run for it. The returned stream is polled until it
    /// ends or the epic is cancelled; dropping it must release everything the
    /// epic holds.
    fn run(&self, actions: ActionStream<A>, state: StateObserver<S>) -> ActionStream<A>;
}

/// Read-only view of the store's current state.
pub struct StateObserver<S> {
    rx: watch::Receiver<Arc<S>>,
}

impl<S> Clone for StateObserver<S> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<S> StateObserver<S> {
    pub fn new(rx: watch::Receiver<Arc<S>>) -> Self {
        Self { rx }
    }

    /// The most recently published state.
    pub fn current(&self) -> Arc<S> {
        Arc::clone(&self.rx.borrow())
    }

    /// Wait for the next state change. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<S>> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }
}

/// The ordered set of epics run by one store.
///
/// Order only decides spawn order; each epic runs independently.
pub struct RootEpic<A, S> {
    epics: Vec<Box<dyn Epic<A, S>>>,
}

impl<A: 'static, S: 'static> RootEpic<A, S> {
    pub fn names(&self) -> Vec<&'static str> {
        self.epics.iter().map(|epic| epic.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.epics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epics.is_empty()
    }

    pub(crate) fn into_epics(self) -> Vec<Box<dyn Epic<A, S>>> {
        self.epics
    }
}

/// Merge epics into one root epic whose output is the interleaving of all of
/// theirs.
pub fn combine_epics<A, S>(epics: impl IntoIterator<Item = Box<dyn Epic<A, S>>>) -> RootEpic<A, S> {
    RootEpic {
        epics: epics.into_iter().collect(),
    }
}

/// Adapt one broadcast subscription into an epic's input stream.
///
/// A subscriber that falls more than the channel capacity behind loses the
/// oldest actions; that is logged and the stream carries on.
pub(crate) fn subscription_stream<A>(
    rx: broadcast::Receiver<A>,
    epic: &'static str,
) -> ActionStream<A>
where
    A: Clone + Send + 'static,
{
    Box::pin(stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(action) => return Some((action, rx)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(epic, skipped, "Epic fell behind the action stream");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures_util::StreamExt;

    struct Named(&'static str);

    impl Epic<u32, ()> for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn run(&self, actions: ActionStream<u32>, _state: StateObserver<()>) -> ActionStream<u32> {
            actions
        }
    }

    #[test]
    fn combine_keeps_registration_order() {
        let root = combine_epics::<u32, ()>([
            Box::new(Named("first")) as Box<dyn Epic<u32, ()>>,
            Box::new(Named("second")),
        ]);
        assert_eq!(root.names(), vec!["first", "second"]);
        assert_eq!(root.len(), 2);
    }

    #[tokio::test]
    async fn subscription_stream_skips_lagged_actions() {
        let (tx, rx) = broadcast::channel(2);
        let stream = subscription_stream(rx, "test");

        for value in 1..=4u32 {
            tx.send(value).unwrap();
        }
        drop(tx);

        let received: Vec<u32> = stream.collect().await;
        assert_eq!(received, vec![3, 4]);
    }

    #[tokio::test]
    async fn state_observer_sees_updates() {
        let (tx, rx) = watch::channel(Arc::new(1u32));
        let mut observer = StateObserver::new(rx);
        assert_eq!(*observer.current(), 1);

        tx.send_replace(Arc::new(2));
        assert_eq!(observer.changed().await.as_deref(), Some(&2));
        assert_eq!(*observer.current(), 2);

        drop(tx);
        assert!(observer.changed().await.is_none());
    }
}

//! Subscription: one consumer's live connection to the publisher.
//!
//! Exposes the lazy, lossy-in-the-past snapshot stream to a single
//! consumer: non-blocking `current()` polling, one-shot `first()`
//! consumption for initial UI population, and a continuing `updates()`
//! feed for consumers that keep watching.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::Stream;
use log::debug;
use tokio::sync::{broadcast, oneshot};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::error::HarnessError;
use crate::model::LayoutSnapshot;

/// Subscription state machine: Open (no value) -> Open (has value) ->
/// Closed, with TornDown entered from either open state when the
/// publisher deactivates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubscriptionPhase {
    Open,
    Closed,
    TornDown,
}

type Waiter = oneshot::Sender<Result<LayoutSnapshot, HarnessError>>;

#[derive(Debug)]
pub(crate) struct SubscriptionState {
    pub(crate) phase: SubscriptionPhase,
    /// Most-recently-delivered snapshot since subscribing, if any.
    latest: Option<LayoutSnapshot>,
    /// Consumers currently suspended awaiting a value. Each one resumes
    /// with the single delivery that completes it, never a later one.
    waiters: Vec<Waiter>,
}

impl SubscriptionState {
    /// Store `snapshot` as the latest value and resume every suspended
    /// waiter with it.
    pub(crate) fn deliver(&mut self, snapshot: LayoutSnapshot) {
        self.latest = Some(snapshot.clone());
        for waiter in self.waiters.drain(..) {
            // A waiter whose future was dropped is gone; nothing to resume.
            let _ = waiter.send(Ok(snapshot.clone()));
        }
    }

    /// Invalidate the subscription after publisher teardown, failing any
    /// suspended waiters instead of leaving them hanging.
    pub(crate) fn tear_down(&mut self) {
        self.phase = SubscriptionPhase::TornDown;
        self.latest = None;
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(Err(HarnessError::TornDown));
        }
    }
}

/// A consumer's handle onto the publisher's live feed.
///
/// Owned by the consumer; dropping it releases the connection. The
/// publisher keeps only a weak reference, so a forgotten subscription
/// never outlives its consumer.
#[derive(Debug)]
pub struct Subscription {
    cell: Arc<Mutex<SubscriptionState>>,
    feed: broadcast::Sender<LayoutSnapshot>,
}

impl Subscription {
    pub(crate) fn open(
        latest: Option<LayoutSnapshot>,
        feed: broadcast::Sender<LayoutSnapshot>,
    ) -> Self {
        Self {
            cell: Arc::new(Mutex::new(SubscriptionState {
                phase: SubscriptionPhase::Open,
                latest,
                waiters: Vec::new(),
            })),
            feed,
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<Mutex<SubscriptionState>> {
        Arc::downgrade(&self.cell)
    }

    fn lock(&self) -> MutexGuard<'_, SubscriptionState> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Non-blocking read of the most-recently-delivered snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been delivered since
    /// subscribing.
    ///
    /// # Errors
    /// * `SubscriptionClosed` - read after close()
    /// * `TornDown` - publisher was deactivated
    pub fn current(&self) -> Result<Option<LayoutSnapshot>, HarnessError> {
        let state = self.lock();
        match state.phase {
            SubscriptionPhase::Open => Ok(state.latest.clone()),
            SubscriptionPhase::Closed => Err(HarnessError::SubscriptionClosed),
            SubscriptionPhase::TornDown => Err(HarnessError::TornDown),
        }
    }

    /// Await the first available snapshot.
    ///
    /// Resolves immediately when a snapshot has already been delivered,
    /// without suspending; otherwise suspends the caller until the next
    /// publication and resumes with exactly that snapshot. This is a
    /// one-shot consumption, not a continuing subscription.
    ///
    /// # Errors
    /// * `SubscriptionClosed` - subscription closed before or while suspended
    /// * `TornDown` - publisher deactivated before or while suspended
    pub async fn first(&self) -> Result<LayoutSnapshot, HarnessError> {
        let rx = {
            let mut state = self.lock();
            match state.phase {
                SubscriptionPhase::Open => {}
                SubscriptionPhase::Closed => return Err(HarnessError::SubscriptionClosed),
                SubscriptionPhase::TornDown => return Err(HarnessError::TornDown),
            }

            if let Some(snapshot) = state.latest.clone() {
                return Ok(snapshot);
            }

            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            rx
        };

        match rx.await {
            Ok(delivery) => delivery,
            // Waiter dropped without resolution; only teardown paths do this.
            Err(_) => Err(HarnessError::TornDown),
        }
    }

    /// Continuing feed of snapshots published after this call.
    ///
    /// Lagged deliveries are dropped rather than replayed. The stream ends
    /// once the publisher is torn down and every subscription holding the
    /// feed open has been released.
    ///
    /// # Errors
    /// * `SubscriptionClosed` / `TornDown` - lifecycle misuse
    pub fn updates(
        &self,
    ) -> Result<impl Stream<Item = LayoutSnapshot> + Unpin, HarnessError> {
        {
            let state = self.lock();
            match state.phase {
                SubscriptionPhase::Open => {}
                SubscriptionPhase::Closed => return Err(HarnessError::SubscriptionClosed),
                SubscriptionPhase::TornDown => return Err(HarnessError::TornDown),
            }
        }

        let rx = self.feed.subscribe();
        Ok(BroadcastStream::new(rx).filter_map(|delivery| delivery.ok()))
    }

    /// Release the subscription. Idempotent; suspended `first()` callers
    /// resolve with `SubscriptionClosed` rather than hanging.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.phase == SubscriptionPhase::Closed {
            return;
        }

        state.phase = SubscriptionPhase::Closed;
        state.latest = None;
        for waiter in state.waiters.drain(..) {
            let _ = waiter.send(Err(HarnessError::SubscriptionClosed));
        }
        debug!("[Subscription] closed");
    }

    /// Whether reads are currently valid.
    pub fn is_open(&self) -> bool {
        self.lock().phase == SubscriptionPhase::Open
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bounds, FoldState, HingeOrientation, PostureEvent};
    use crate::publisher::LayoutPublisher;

    fn flat_snapshot() -> LayoutSnapshot {
        let event = PostureEvent::new(FoldState::Flat, None, None).unwrap();
        LayoutSnapshot::from(event)
    }

    fn book_snapshot() -> LayoutSnapshot {
        let event = PostureEvent::new(
            FoldState::HalfOpened,
            Some(HingeOrientation::Vertical),
            Some(Bounds::new(539, 0, 541, 1920)),
        )
        .unwrap();
        LayoutSnapshot::from(event)
    }

    #[test]
    fn test_close_is_idempotent() {
        let publisher = LayoutPublisher::new();
        publisher.activate().unwrap();

        let subscription = publisher.subscribe().unwrap();
        assert!(subscription.is_open());

        subscription.close();
        subscription.close();
        assert!(!subscription.is_open());

        match subscription.current().unwrap_err() {
            HarnessError::SubscriptionClosed => {}
            other => panic!("Expected SubscriptionClosed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_after_close_is_rejected() {
        let publisher = LayoutPublisher::new();
        publisher.activate().unwrap();

        let subscription = publisher.subscribe().unwrap();
        subscription.close();

        match subscription.first().await.unwrap_err() {
            HarnessError::SubscriptionClosed => {}
            other => panic!("Expected SubscriptionClosed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_resolves_immediately_with_delivered_value() {
        let publisher = LayoutPublisher::new();
        publisher.activate().unwrap();

        let subscription = publisher.subscribe().unwrap();
        publisher.publish(flat_snapshot()).unwrap();

        let value = subscription.first().await.unwrap();
        assert_eq!(value, flat_snapshot());
    }

    #[test]
    fn test_closed_subscription_no_longer_receives_deliveries() {
        let publisher = LayoutPublisher::new();
        publisher.activate().unwrap();

        let subscription = publisher.subscribe().unwrap();
        subscription.close();
        publisher.publish(book_snapshot()).unwrap();

        match subscription.current().unwrap_err() {
            HarnessError::SubscriptionClosed => {}
            other => panic!("Expected SubscriptionClosed, got {:?}", other),
        }
    }

    #[test]
    fn test_close_after_teardown_reports_closed() {
        let publisher = LayoutPublisher::new();
        publisher.activate().unwrap();

        let subscription = publisher.subscribe().unwrap();
        publisher.deactivate().unwrap();
        subscription.close();

        // Use-after-release is the nearer cause once close() has run.
        match subscription.current().unwrap_err() {
            HarnessError::SubscriptionClosed => {}
            other => panic!("Expected SubscriptionClosed, got {:?}", other),
        }
    }
}

//! LayoutPublisher: controllable window-layout event source.
//!
//! Stands in for a real posture-sensing subsystem, giving the driver full
//! temporal control over when layout snapshots reach subscribers. The
//! publisher is the single shared resource: subscriptions read it, only
//! the driver calls `activate`/`publish`/`deactivate`.

use std::sync::{Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, info};
use tokio::sync::broadcast;

use crate::config::TrackerConfig;
use crate::error::HarnessError;
use crate::model::LayoutSnapshot;

mod subscription;

pub use subscription::Subscription;
use subscription::{SubscriptionPhase, SubscriptionState};

/// Publisher lifecycle state machine.
///
/// Reaches `Active` before any subscription is created and is terminal at
/// `TornDown`; a torn-down publisher is never reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Uninitialized,
    Active,
    TornDown,
}

struct PublisherInner {
    state: LifecycleState,
    /// Last published snapshot; seeds subscriptions that attach late.
    last: Option<LayoutSnapshot>,
    feed_tx: Option<broadcast::Sender<LayoutSnapshot>>,
    subscriptions: Vec<Weak<Mutex<SubscriptionState>>>,
}

/// Controllable, driver-scoped source of [LayoutSnapshot] deliveries.
///
/// Delivery is synchronous from the publisher's perspective: by the time
/// `publish` returns, every open subscription's latest slot holds the new
/// snapshot and every suspended `first()` caller has been scheduled to
/// resume with it.
pub struct LayoutPublisher {
    inner: Mutex<PublisherInner>,
    config: TrackerConfig,
}

impl LayoutPublisher {
    /// Create an inactive publisher with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// Create an inactive publisher with the given configuration.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            inner: Mutex::new(PublisherInner {
                state: LifecycleState::Uninitialized,
                last: None,
                feed_tx: None,
                subscriptions: Vec::new(),
            }),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PublisherInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transition Uninitialized -> Active and open the live feed.
    ///
    /// # Errors
    /// * `AlreadyActive` - called while already active; double activation
    ///   indicates a setup ordering bug and is rejected rather than
    ///   silently accepted
    /// * `TornDown` - the lifecycle machine is terminal after deactivate()
    pub fn activate(&self) -> Result<(), HarnessError> {
        let mut inner = self.lock();
        match inner.state {
            LifecycleState::Uninitialized => {}
            LifecycleState::Active => return Err(HarnessError::AlreadyActive),
            LifecycleState::TornDown => return Err(HarnessError::TornDown),
        }

        let (feed_tx, _) = broadcast::channel(self.config.feed.buffer);
        inner.feed_tx = Some(feed_tx);
        inner.state = LifecycleState::Active;
        info!("[LayoutPublisher] activated");
        Ok(())
    }

    /// Open a live connection for one consumer.
    ///
    /// The new subscription's latest slot is seeded with the newest
    /// snapshot published so far, if any; it never sees historical states.
    ///
    /// # Errors
    /// * `NotActive` - activate() has not been called
    /// * `TornDown` - the publisher has been deactivated
    pub fn subscribe(&self) -> Result<Subscription, HarnessError> {
        let mut inner = self.lock();
        match inner.state {
            LifecycleState::Active => {}
            LifecycleState::Uninitialized => return Err(HarnessError::NotActive),
            LifecycleState::TornDown => return Err(HarnessError::TornDown),
        }

        let feed = match &inner.feed_tx {
            Some(tx) => tx.clone(),
            None => return Err(HarnessError::NotActive),
        };

        let subscription = Subscription::open(inner.last.clone(), feed);
        inner.subscriptions.push(subscription.downgrade());
        debug!(
            "[LayoutPublisher] subscription opened ({} live)",
            inner.subscriptions.len()
        );
        Ok(subscription)
    }

    /// Deliver `snapshot` to every currently-open subscription.
    ///
    /// Each suspended `first()` caller is resumed with exactly this
    /// snapshot, captured at delivery time; later publishes never coalesce
    /// into an earlier waiter's resumption. Consumers that have not yet
    /// attached will only ever observe the newest snapshot at attach time.
    ///
    /// # Errors
    /// * `NotActive` / `TornDown` - lifecycle misuse by the driver
    pub fn publish(&self, snapshot: LayoutSnapshot) -> Result<(), HarnessError> {
        let mut inner = self.lock();
        match inner.state {
            LifecycleState::Active => {}
            LifecycleState::Uninitialized => return Err(HarnessError::NotActive),
            LifecycleState::TornDown => return Err(HarnessError::TornDown),
        }

        inner.last = Some(snapshot.clone());

        if let Some(tx) = &inner.feed_tx {
            // No receivers is fine; the feed is a best-effort side channel.
            let _ = tx.send(snapshot.clone());
        }

        inner.subscriptions.retain(|weak| weak.strong_count() > 0);
        let mut delivered = 0;
        for weak in &inner.subscriptions {
            if let Some(cell) = weak.upgrade() {
                let mut state = cell.lock().unwrap_or_else(PoisonError::into_inner);
                if state.phase != SubscriptionPhase::Open {
                    continue;
                }
                state.deliver(snapshot.clone());
                delivered += 1;
            }
        }

        debug!(
            "[LayoutPublisher] published snapshot with {} feature(s) to {} subscription(s)",
            snapshot.len(),
            delivered
        );
        Ok(())
    }

    /// Transition Active -> TornDown, invalidating all outstanding
    /// subscriptions.
    ///
    /// Suspended `first()` callers resolve with `TornDown` rather than
    /// hanging; subsequent reads on the subscriptions fail the same way.
    ///
    /// # Errors
    /// * `NotActive` - never activated
    /// * `TornDown` - already deactivated
    pub fn deactivate(&self) -> Result<(), HarnessError> {
        let mut inner = self.lock();
        match inner.state {
            LifecycleState::Active => {}
            LifecycleState::Uninitialized => return Err(HarnessError::NotActive),
            LifecycleState::TornDown => return Err(HarnessError::TornDown),
        }

        inner.state = LifecycleState::TornDown;
        inner.feed_tx = None;
        inner.last = None;

        let mut invalidated = 0;
        for weak in inner.subscriptions.drain(..) {
            if let Some(cell) = weak.upgrade() {
                let mut state = cell.lock().unwrap_or_else(PoisonError::into_inner);
                if state.phase == SubscriptionPhase::Open {
                    state.tear_down();
                    invalidated += 1;
                }
            }
        }

        info!(
            "[LayoutPublisher] deactivated, {} subscription(s) invalidated",
            invalidated
        );
        Ok(())
    }

    /// Whether the publisher is currently accepting subscriptions.
    pub fn is_active(&self) -> bool {
        self.lock().state == LifecycleState::Active
    }
}

impl Default for LayoutPublisher {
    fn default() -> Self {
        Self::new()
    }
}

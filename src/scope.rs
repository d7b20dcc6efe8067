//! Scoped publisher lifecycle.
//!
//! The publisher must exist and be active before any consumer attaches,
//! and must outlive every consumer attached under it. [PublisherScope]
//! encodes that ordering as a guard: activation happens on construction,
//! teardown on drop. Consumers constructed after the scope (and therefore
//! dropped before it, per drop order) release their subscriptions before
//! the publisher deactivates.

use std::ops::Deref;

use log::debug;

use crate::config::TrackerConfig;
use crate::error::{log_harness_error, HarnessError};
use crate::publisher::LayoutPublisher;

/// Guard owning an activated [LayoutPublisher].
///
/// ```no_run
/// # use posture_tracker::scope::PublisherScope;
/// # use posture_tracker::readout::PostureReadout;
/// # fn demo() -> Result<(), posture_tracker::error::HarnessError> {
/// let scope = PublisherScope::start()?;
/// let readout = PostureReadout::attach(&scope)?;
/// // readout drops before scope, scope deactivates the publisher
/// # Ok(())
/// # }
/// ```
pub struct PublisherScope {
    publisher: LayoutPublisher,
}

impl PublisherScope {
    /// Build and activate a publisher with default configuration.
    pub fn start() -> Result<Self, HarnessError> {
        Self::start_with_config(TrackerConfig::default())
    }

    /// Build and activate a publisher with the given configuration.
    pub fn start_with_config(config: TrackerConfig) -> Result<Self, HarnessError> {
        let publisher = LayoutPublisher::with_config(config);
        publisher.activate()?;
        debug!("[PublisherScope] started");
        Ok(Self { publisher })
    }

    pub fn publisher(&self) -> &LayoutPublisher {
        &self.publisher
    }
}

impl Deref for PublisherScope {
    type Target = LayoutPublisher;

    fn deref(&self) -> &Self::Target {
        &self.publisher
    }
}

impl Drop for PublisherScope {
    fn drop(&mut self) {
        if let Err(err) = self.publisher.deactivate() {
            // Already torn down by hand; nothing left to release.
            log_harness_error(&err, "PublisherScope::drop");
        }
        debug!("[PublisherScope] finished");
    }
}

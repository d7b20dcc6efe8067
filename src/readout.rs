//! PostureReadout: the presentation-side consumer of the layout feed.
//!
//! A small view-model standing where a UI controller would: it attaches
//! to an active publisher, awaits the first snapshot, and exposes the
//! derived facts a screen would show. Per posture event the readout
//! renders three lines: the literal state name, whether the displays are
//! separated, and the hinge orientation label.

use log::{debug, info};

use crate::error::HarnessError;
use crate::model::{LayoutSnapshot, PostureEvent};
use crate::publisher::{LayoutPublisher, Subscription};

/// Render the externally-observable facts for one posture event.
fn render_event(event: &PostureEvent) -> [String; 3] {
    let separation = if event.is_separated() {
        "Displays are separated".to_string()
    } else {
        "Display is not separated".to_string()
    };

    [
        format!("state = {}", event.state()),
        separation,
        event.orientation_label(),
    ]
}

/// Consumer view-model fed by a [Subscription].
///
/// Construction subscribes immediately, so building a readout against a
/// publisher that is not yet active fails with `NotActive` instead of
/// silently watching a stale source.
#[derive(Debug)]
pub struct PostureReadout {
    subscription: Subscription,
    lines: Vec<String>,
}

impl PostureReadout {
    /// Attach to an active publisher.
    ///
    /// # Errors
    /// * `NotActive` - the publisher has not been activated
    /// * `TornDown` - the publisher has been deactivated
    pub fn attach(publisher: &LayoutPublisher) -> Result<Self, HarnessError> {
        let subscription = publisher.subscribe()?;
        debug!("[PostureReadout] attached");
        Ok(Self {
            subscription,
            lines: Vec::new(),
        })
    }

    /// Await the first available snapshot and render its derived facts.
    ///
    /// Returns the snapshot that populated the readout; the rendered
    /// lines are available from [lines](Self::lines) afterwards.
    pub async fn await_first_layout(&mut self) -> Result<LayoutSnapshot, HarnessError> {
        let snapshot = self.subscription.first().await?;
        self.apply(&snapshot);
        Ok(snapshot)
    }

    /// Re-render from the latest delivered snapshot without suspending.
    ///
    /// Leaves the readout unchanged when nothing has been delivered yet.
    pub fn refresh(&mut self) -> Result<(), HarnessError> {
        if let Some(snapshot) = self.subscription.current()? {
            self.apply(&snapshot);
        }
        Ok(())
    }

    fn apply(&mut self, snapshot: &LayoutSnapshot) {
        self.lines.clear();
        for event in snapshot.events() {
            self.lines.extend(render_event(event));
        }

        if snapshot.is_empty() {
            info!("[PostureReadout] layout has no fold features");
        } else {
            info!(
                "[PostureReadout] showing {} fold feature(s)",
                snapshot.len()
            );
        }
    }

    /// Visible output lines, in event order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when any visible line contains `needle`.
    pub fn displays(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Release the underlying subscription.
    pub fn detach(self) {
        self.subscription.close();
    }
}

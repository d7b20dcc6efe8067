//! Synthetic posture event fabrication.
//!
//! Drivers need valid posture events without real sensor input. The
//! builder here fabricates them with sensible defaults: a half-opened,
//! horizontal fold whose hinge runs through the center of the configured
//! window, the common starting point for fold-aware UI checks.

use crate::config::WindowConfig;
use crate::error::PostureError;
use crate::model::{Bounds, FoldState, HingeOrientation, LayoutSnapshot, PostureEvent};

/// Builder for synthetic [PostureEvent]s.
///
/// Folded states receive separation bounds centered in the window: a
/// horizontal hinge is a strip across the window's vertical midline, a
/// vertical hinge a strip across its horizontal midline. `size` is the
/// hinge thickness in pixels; the default 0 models a seam. Flat states
/// carry no bounds.
#[derive(Debug, Clone)]
pub struct PostureEventBuilder {
    state: FoldState,
    orientation: HingeOrientation,
    window: WindowConfig,
    size: i32,
}

impl PostureEventBuilder {
    pub fn new() -> Self {
        Self {
            state: FoldState::HalfOpened,
            orientation: HingeOrientation::Horizontal,
            window: WindowConfig::default(),
            size: 0,
        }
    }

    pub fn state(mut self, state: FoldState) -> Self {
        self.state = state;
        self
    }

    pub fn orientation(mut self, orientation: HingeOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Hinge thickness in pixels.
    pub fn size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    fn centered_bounds(&self) -> Bounds {
        match self.orientation {
            HingeOrientation::Horizontal => {
                let top = (self.window.height - self.size) / 2;
                Bounds::new(0, top, self.window.width, top + self.size)
            }
            HingeOrientation::Vertical => {
                let left = (self.window.width - self.size) / 2;
                Bounds::new(left, 0, left + self.size, self.window.height)
            }
        }
    }

    /// Build the event.
    pub fn build(self) -> Result<PostureEvent, PostureError> {
        let bounds = match self.state {
            FoldState::Flat => None,
            FoldState::HalfOpened | FoldState::FullyOpened => Some(self.centered_bounds()),
        };
        PostureEvent::new(self.state, Some(self.orientation), bounds)
    }

    /// Build a single-event snapshot.
    pub fn build_snapshot(self) -> Result<LayoutSnapshot, PostureError> {
        Ok(LayoutSnapshot::from(self.build()?))
    }
}

impl Default for PostureEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Posture event model: immutable value types describing one instant of
//! device shape.
//!
//! A [PostureEvent] captures a single fold feature (state, hinge
//! orientation, separation region); a [LayoutSnapshot] is the ordered set
//! of features active at one moment. Both are plain values compared
//! structurally, created once and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PostureError;

/// Physical fold configuration of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldState {
    Flat,
    HalfOpened,
    FullyOpened,
}

impl fmt::Display for FoldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FoldState::Flat => "FLAT",
            FoldState::HalfOpened => "HALF_OPENED",
            FoldState::FullyOpened => "FULLY_OPENED",
        };
        write!(f, "{}", name)
    }
}

/// Direction the fold boundary runs relative to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HingeOrientation {
    Horizontal,
    Vertical,
}

impl fmt::Display for HingeOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HingeOrientation::Horizontal => "horizontal",
            HingeOrientation::Vertical => "vertical",
        };
        write!(f, "{}", name)
    }
}

/// Integer rectangle describing where the display area is split.
///
/// Coordinates follow screen convention: origin top-left, `right` and
/// `bottom` exclusive. A zero-thickness rectangle is legal and describes
/// a seam rather than an occluding hinge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// One instantaneous fold feature.
///
/// Constructed only through [PostureEvent::new], which enforces the
/// separation invariant: a flat device has no separation region, while a
/// half-opened or fully-opened device always has one plus a defined
/// hinge orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostureEvent {
    state: FoldState,
    orientation: Option<HingeOrientation>,
    bounds: Option<Bounds>,
}

impl PostureEvent {
    /// Build a validated posture event.
    ///
    /// # Errors
    /// - `PostureError::FlatWithBounds` - flat state with a separation region
    /// - `PostureError::MissingBounds` - folded state without a separation region
    /// - `PostureError::MissingOrientation` - folded state without a hinge orientation
    pub fn new(
        state: FoldState,
        orientation: Option<HingeOrientation>,
        bounds: Option<Bounds>,
    ) -> Result<Self, PostureError> {
        match state {
            FoldState::Flat => {
                if bounds.is_some() {
                    return Err(PostureError::FlatWithBounds);
                }
            }
            FoldState::HalfOpened | FoldState::FullyOpened => {
                if bounds.is_none() {
                    return Err(PostureError::MissingBounds { state });
                }
                if orientation.is_none() {
                    return Err(PostureError::MissingOrientation { state });
                }
            }
        }

        Ok(Self {
            state,
            orientation,
            bounds,
        })
    }

    pub fn state(&self) -> FoldState {
        self.state
    }

    pub fn orientation(&self) -> Option<HingeOrientation> {
        self.orientation
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// True iff the display area is split into regions by this feature.
    pub fn is_separated(&self) -> bool {
        self.bounds.is_some()
    }

    /// Human-readable hinge classification, derived purely from the
    /// orientation field.
    pub fn orientation_label(&self) -> String {
        match self.orientation {
            Some(orientation) => format!("Hinge is {}", orientation),
            None => "Hinge orientation unknown".to_string(),
        }
    }
}

/// Ordered, immutable list of the posture events active at one instant.
///
/// Supports multi-hinge devices by holding zero or more events; equality
/// is sequence equality of the elements. A snapshot is superseded by the
/// next publication, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    events: Vec<PostureEvent>,
}

impl LayoutSnapshot {
    pub fn new(events: Vec<PostureEvent>) -> Self {
        Self { events }
    }

    /// Snapshot with no active fold features.
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[PostureEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<PostureEvent> for LayoutSnapshot {
    fn from(event: PostureEvent) -> Self {
        Self::new(vec![event])
    }
}

// Posture event construction error types

use std::fmt;

use log::error;

use crate::error::ErrorCode;
use crate::model::FoldState;

/// Posture error code constants
///
/// Error code range: 2001-2003
pub struct PostureErrorCodes {}

impl PostureErrorCodes {
    /// Flat state combined with a separation region
    pub const FLAT_WITH_BOUNDS: i32 = 2001;

    /// Folded state without a separation region
    pub const MISSING_BOUNDS: i32 = 2002;

    /// Folded state without a hinge orientation
    pub const MISSING_ORIENTATION: i32 = 2003;
}

/// Log a posture construction error with structured context
pub fn log_posture_error(err: &PostureError, context: &str) {
    error!(
        "Posture error in {}: code={}, component=PostureEvent, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Malformed posture event construction
///
/// Raised only by `PostureEvent::new` when the separation invariant is
/// violated. Never recoverable; always surfaced to the constructing
/// caller.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureError {
    /// A flat device has no meaningful separation region
    FlatWithBounds,

    /// Half-opened and fully-opened devices are split by the fold
    MissingBounds { state: FoldState },

    /// A fold boundary always has an orientation
    MissingOrientation { state: FoldState },
}

impl ErrorCode for PostureError {
    fn code(&self) -> i32 {
        match self {
            PostureError::FlatWithBounds => PostureErrorCodes::FLAT_WITH_BOUNDS,
            PostureError::MissingBounds { .. } => PostureErrorCodes::MISSING_BOUNDS,
            PostureError::MissingOrientation { .. } => PostureErrorCodes::MISSING_ORIENTATION,
        }
    }

    fn message(&self) -> String {
        match self {
            PostureError::FlatWithBounds => {
                "Flat posture cannot carry separation bounds".to_string()
            }
            PostureError::MissingBounds { state } => {
                format!("{} posture requires separation bounds", state)
            }
            PostureError::MissingOrientation { state } => {
                format!("{} posture requires a hinge orientation", state)
            }
        }
    }
}

impl fmt::Display for PostureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PostureError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PostureError {}

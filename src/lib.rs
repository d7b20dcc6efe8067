// Posture Tracker - controllable window-layout publisher harness
// Deterministic delivery of device-posture snapshots to async subscribers

// Module declarations
pub mod config;
pub mod error;
pub mod model;
pub mod publisher;
pub mod readout;
pub mod scope;
pub mod testing;

// Re-exports for convenience
pub use config::{FeedConfig, TrackerConfig, WindowConfig};
pub use error::{ErrorCode, HarnessError, PostureError};
pub use model::{Bounds, FoldState, HingeOrientation, LayoutSnapshot, PostureEvent};
pub use publisher::{LayoutPublisher, Subscription};
pub use readout::PostureReadout;
pub use scope::PublisherScope;
pub use testing::PostureEventBuilder;

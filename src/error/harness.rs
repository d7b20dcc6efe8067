// Publisher lifecycle and subscription error types

use std::fmt;

use log::error;

use crate::error::ErrorCode;

/// Harness error code constants
///
/// These constants provide a single source of truth for error codes used
/// in logs and assertions across the publisher, subscription, and scope
/// layers.
///
/// Error code range: 1001-1004
pub struct HarnessErrorCodes {}

impl HarnessErrorCodes {
    /// Publisher activated while already active
    pub const ALREADY_ACTIVE: i32 = 1001;

    /// Operation requires an active publisher
    pub const NOT_ACTIVE: i32 = 1002;

    /// Publisher has been deactivated
    pub const TORN_DOWN: i32 = 1003;

    /// Subscription used after close()
    pub const SUBSCRIPTION_CLOSED: i32 = 1004;
}

/// Log a harness error with structured context
///
/// Logs lifecycle-sequencing errors with the numeric error code and the
/// call site that observed them. These errors indicate test-ordering
/// bugs, so they are always worth surfacing in the log.
pub fn log_harness_error(err: &HarnessError, context: &str) {
    error!(
        "Harness error in {}: code={}, component=LayoutPublisher, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Publisher lifecycle and subscription errors
///
/// Every variant indicates a sequencing mistake by the caller, not a
/// transient condition: none are retried internally and all propagate to
/// the caller unmodified.
///
/// Error code range: 1001-1004
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    /// activate() called while the publisher is already active
    AlreadyActive,

    /// Operation requires activate() to have been called first
    NotActive,

    /// Publisher was deactivated; outstanding subscriptions are invalid
    TornDown,

    /// Subscription was closed; reads after close() are rejected
    SubscriptionClosed,
}

impl ErrorCode for HarnessError {
    fn code(&self) -> i32 {
        match self {
            HarnessError::AlreadyActive => HarnessErrorCodes::ALREADY_ACTIVE,
            HarnessError::NotActive => HarnessErrorCodes::NOT_ACTIVE,
            HarnessError::TornDown => HarnessErrorCodes::TORN_DOWN,
            HarnessError::SubscriptionClosed => HarnessErrorCodes::SUBSCRIPTION_CLOSED,
        }
    }

    fn message(&self) -> String {
        match self {
            HarnessError::AlreadyActive => {
                "Publisher already active. Double activation indicates a setup ordering bug."
                    .to_string()
            }
            HarnessError::NotActive => {
                "Publisher not active. Call activate() first.".to_string()
            }
            HarnessError::TornDown => {
                "Publisher torn down. Subscriptions created under it are no longer readable."
                    .to_string()
            }
            HarnessError::SubscriptionClosed => {
                "Subscription closed. Reads after close() are invalid.".to_string()
            }
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HarnessError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for HarnessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_error_codes() {
        assert_eq!(
            HarnessError::AlreadyActive.code(),
            HarnessErrorCodes::ALREADY_ACTIVE
        );
        assert_eq!(HarnessError::NotActive.code(), HarnessErrorCodes::NOT_ACTIVE);
        assert_eq!(HarnessError::TornDown.code(), HarnessErrorCodes::TORN_DOWN);
        assert_eq!(
            HarnessError::SubscriptionClosed.code(),
            HarnessErrorCodes::SUBSCRIPTION_CLOSED
        );
    }

    #[test]
    fn test_harness_error_messages() {
        assert!(HarnessError::AlreadyActive
            .message()
            .contains("already active"));
        assert!(HarnessError::NotActive.message().contains("activate()"));
        assert!(HarnessError::TornDown.message().contains("torn down"));
        assert!(HarnessError::SubscriptionClosed
            .message()
            .contains("closed"));
    }

    #[test]
    fn test_harness_error_display() {
        let err = HarnessError::TornDown;
        let display = format!("{}", err);
        assert!(display.contains("HarnessError"));
        assert!(display.contains(&err.code().to_string()));
    }
}

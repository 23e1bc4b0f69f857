//! Error types used by the feed bridge and its subscribers.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`]: errors raised by the bridge itself while shutting down.
//! - [`DeliveryError`]: errors raised when a subscriber cannot accept an event.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Neither is ever returned to a caller of [`Bridge::publish`](crate::Bridge::publish):
//! delivery errors are absorbed at the fan-out boundary and turned into a detach.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the bridge runtime.
///
/// These represent failures of the bridge machinery, not of individual
/// subscribers, and are only surfaced by [`Bridge::shutdown`](crate::Bridge::shutdown).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; the listed workers were aborted.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the workers that did not stop in time.
        stuck: Vec<String>,
    },

    /// The pump task panicked instead of exiting its loop.
    #[error("pump task panicked: {reason}")]
    PumpPanicked {
        /// Panic payload rendered as text.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use profile_feed::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::PumpPanicked { .. } => "runtime_pump_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck workers={stuck:?}")
            }
            RuntimeError::PumpPanicked { reason } => format!("pump panicked: {reason}"),
        }
    }
}

/// # Errors produced while handing an event to one subscriber.
///
/// Every variant results in that subscriber being detached. Other subscribers
/// and the pump are never affected.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The consumer side of the subscription is gone (connection closed, handle dropped).
    #[error("subscriber closed")]
    Closed,

    /// The subscriber's bounded queue was full; it cannot keep up.
    #[error("subscriber lagging: queue of {capacity} events is full")]
    Lagging {
        /// Capacity of the queue that overflowed.
        capacity: usize,
    },

    /// The sink refused the event (e.g. the outbound session failed).
    #[error("sink rejected event: {reason}")]
    Rejected {
        /// Reason reported by the sink.
        reason: String,
    },
}

impl DeliveryError {
    /// Convenience constructor for [`DeliveryError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        DeliveryError::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use profile_feed::DeliveryError;
    ///
    /// assert_eq!(DeliveryError::Lagging { capacity: 8 }.as_label(), "delivery_lagging");
    /// assert_eq!(DeliveryError::rejected("socket reset").as_label(), "delivery_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Closed => "delivery_closed",
            DeliveryError::Lagging { .. } => "delivery_lagging",
            DeliveryError::Rejected { .. } => "delivery_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::Closed => "subscriber closed".to_string(),
            DeliveryError::Lagging { capacity } => format!("queue full (capacity={capacity})"),
            DeliveryError::Rejected { reason } => format!("rejected: {reason}"),
        }
    }
}

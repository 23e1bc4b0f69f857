//! # Bridge configuration.
//!
//! Provides [`Config`], the centralized settings of a [`Bridge`](crate::Bridge).
//!
//! ## Sentinel values
//! - `subscriber_capacity = 0` → clamped to 1
//! - `grace = 0s` → do not wait on shutdown; workers still running are aborted

use std::time::Duration;

/// Settings of the feed bridge.
///
/// ## Field semantics
/// - `subscriber_capacity`: bounded queue per pull subscriber (min 1)
/// - `grace`: maximum wait for the pump and sink workers on shutdown
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of each subscription's queue.
    ///
    /// A subscriber that falls this many events behind is detached instead of
    /// slowing the pump down. Push sinks use [`Subscribe::queue_capacity`](crate::Subscribe::queue_capacity).
    pub subscriber_capacity: usize,

    /// Maximum time to wait for a clean shutdown before aborting.
    ///
    /// When [`Bridge::shutdown`](crate::Bridge::shutdown) runs:
    /// - The pump is cancelled, drains what is queued and exits
    /// - All subscribers are detached
    /// - Sink workers finish what they hold
    /// - Anything still running after `grace` is aborted → `RuntimeError::GraceExceeded`
    pub grace: Duration,
}

impl Config {
    /// Returns the subscriber capacity clamped to a minimum of 1.
    #[inline]
    pub fn subscriber_capacity_clamped(&self) -> usize {
        self.subscriber_capacity.max(1)
    }

    /// Returns the shutdown grace as an `Option`.
    ///
    /// - `None` → do not wait
    /// - `Some(d)` → wait up to `d`
    #[inline]
    pub fn grace_period(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `subscriber_capacity = 256`
    /// - `grace = 5s`
    fn default() -> Self {
        Self {
            subscriber_capacity: 256,
            grace: Duration::from_secs(5),
        }
    }
}

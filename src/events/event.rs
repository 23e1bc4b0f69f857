//! # Feed events emitted by the profile service.
//!
//! A single event type exists: "profile created". An [`Event`] is built once per
//! successful create, never mutated, and shared between subscribers behind an
//! `Arc`, so fan-out never copies the profile.
//!
//! ## Ordering
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically in **creation** order. Delivery order is decided by the ingress
//! queue, see [`Publisher`](crate::Publisher).
//!
//! ## Example
//! ```rust
//! use profile_feed::{Event, Profile};
//!
//! let ev = Event::profile_created(Profile::new("42", "a@email.com"));
//!
//! assert_eq!(ev.profile_id(), "42");
//! assert_eq!(ev.profile.email, "a@email.com");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::profiles::Profile;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Immutable "profile created" notification.
///
/// - `seq`: monotonic global sequence (creation order)
/// - `at`: wall-clock timestamp (for logs and outbound frames)
/// - `profile`: the record that was created
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// The created profile.
    pub profile: Arc<Profile>,
}

impl Event {
    /// Creates an event for a freshly persisted profile.
    pub fn profile_created(profile: impl Into<Arc<Profile>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            profile: profile.into(),
        }
    }

    /// Identifier of the profile that triggered the event.
    #[inline]
    pub fn profile_id(&self) -> &str {
        &self.profile.id
    }

    /// Timestamp as milliseconds since the Unix epoch (0 if the clock is before it).
    #[inline]
    pub fn timestamp_millis(&self) -> u64 {
        self.at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::profile_created(Profile::new("a", "a@email.com"));
        let b = Event::profile_created(Profile::new("b", "b@email.com"));
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_clone_shares_profile() {
        let ev = Event::profile_created(Profile::new("x", "x@email.com"));
        let copy = ev.clone();
        assert!(Arc::ptr_eq(&ev.profile, &copy.profile));
        assert_eq!(copy.seq, ev.seq);
    }

    #[test]
    fn test_timestamp_is_after_epoch() {
        let ev = Event::profile_created(Profile::new("t", "t@email.com"));
        assert!(ev.timestamp_millis() > 0);
    }
}

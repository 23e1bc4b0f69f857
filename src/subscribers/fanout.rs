//! # Non-blocking event fan-out to a dynamic set of subscribers.
//!
//! Provides [`FanOut`]: the hot multicast stage that distributes the pump's single
//! event sequence to every currently attached [`Subscription`].
//!
//! ## Architecture
//! ```text
//! emit(position, event)                        (pump only)
//!     │
//!     │  snapshot registry under lock, release lock
//!     │
//!     ├──► [queue 1] ──► Subscription 1 ──► ws session
//!     │    (bounded)
//!     ├──► [queue 2] ──► Subscription 2 ──► sse stream
//!     │    (bounded)
//!     └──► [queue N] ──► sink worker N  ──► sink.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **Hot**: a subscription only sees entries published after it attached.
//! - **Non-blocking**: `emit()` uses `try_send`, it never waits on a subscriber.
//! - **Isolation**: a full queue (slow subscriber) or a closed queue (consumer gone)
//!   detaches that subscriber only; the pump and the others are unaffected.
//! - **Per-subscriber FIFO**: each subscriber sees events in emission order.
//! - **Lock scope**: the registry lock guards attach/detach and the snapshot copy,
//!   never the delivery itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use super::subscription::{Subscription, SubscriptionId};
use crate::error::DeliveryError;
use crate::events::Event;

/// Per-subscriber channel metadata.
struct Slot {
    sender: mpsc::Sender<Arc<Event>>,
    attached: Arc<AtomicBool>,
    /// Ingress position current at attach time; entries at or below it are skipped.
    after: u64,
    capacity: usize,
}

struct Registry {
    slots: HashMap<SubscriptionId, Slot>,
    closed: bool,
}

/// Copy of one slot taken for a single emission.
struct Target {
    id: SubscriptionId,
    sender: mpsc::Sender<Arc<Event>>,
    after: u64,
    capacity: usize,
}

/// Outcome of one [`FanOut::emit`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Subscribers the event was queued for.
    pub delivered: usize,
    /// Subscribers that attached after the event was published.
    pub skipped: usize,
    /// Subscribers detached because they could not accept the event.
    pub detached: usize,
}

/// Fan-out coordinator for a dynamic set of subscriptions.
///
/// Exactly one instance exists per [`Bridge`](crate::Bridge); every transport
/// adapter attaches to that same instance.
pub struct FanOut {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
    capacity: usize,
}

impl FanOut {
    /// Creates an empty fan-out stage; `capacity` is the default per-subscriber
    /// queue size (clamped to a minimum of 1).
    #[must_use]
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            registry: Mutex::new(Registry {
                slots: HashMap::new(),
                closed: false,
            }),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
        })
    }

    /// Default per-subscriber queue capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registers a new subscriber that will see entries published after `after`.
    pub fn attach(self: &Arc<Self>, after: u64) -> Subscription {
        self.attach_with_capacity(after, self.capacity)
    }

    /// Same as [`attach`](Self::attach) with an explicit queue capacity.
    ///
    /// Attaching to a closed stage returns an already detached subscription.
    pub fn attach_with_capacity(self: &Arc<Self>, after: u64, capacity: usize) -> Subscription {
        let capacity = capacity.max(1);
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(capacity);
        let attached = Arc::new(AtomicBool::new(false));

        {
            let mut reg = self.registry();
            if !reg.closed {
                attached.store(true, Ordering::Release);
                reg.slots.insert(
                    id,
                    Slot {
                        sender: tx,
                        attached: Arc::clone(&attached),
                        after,
                        capacity,
                    },
                );
            }
        }

        if attached.load(Ordering::Acquire) {
            tracing::debug!(subscription = %id, after, capacity, "subscriber attached");
        } else {
            tracing::debug!(subscription = %id, "attach after close; subscription starts detached");
        }
        Subscription::new(id, rx, attached, Arc::downgrade(self))
    }

    /// Removes a subscriber. Idempotent; returns `true` if it was attached.
    pub fn detach(&self, id: SubscriptionId) -> bool {
        let removed = self.registry().slots.remove(&id);
        match removed {
            Some(slot) => {
                slot.attached.store(false, Ordering::Release);
                tracing::debug!(subscription = %id, "subscriber detached");
                true
            }
            None => false,
        }
    }

    /// Delivers one event to every subscriber attached before it was published.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: detaches that subscriber ([`DeliveryError::Lagging`])
    /// - On queue closed: detaches that subscriber ([`DeliveryError::Closed`])
    pub fn emit(&self, position: u64, event: Arc<Event>) -> Delivery {
        let targets: Vec<Target> = {
            let reg = self.registry();
            if reg.closed {
                return Delivery::default();
            }
            reg.slots
                .iter()
                .map(|(id, slot)| Target {
                    id: *id,
                    sender: slot.sender.clone(),
                    after: slot.after,
                    capacity: slot.capacity,
                })
                .collect()
        };

        let mut delivery = Delivery::default();
        let mut failed = Vec::new();

        for target in targets {
            if position <= target.after {
                delivery.skipped += 1;
                continue;
            }
            match target.sender.try_send(Arc::clone(&event)) {
                Ok(()) => delivery.delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => failed.push((
                    target.id,
                    DeliveryError::Lagging {
                        capacity: target.capacity,
                    },
                )),
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    failed.push((target.id, DeliveryError::Closed))
                }
            }
        }

        for (id, err) in failed {
            if self.detach(id) {
                delivery.detached += 1;
                match err {
                    DeliveryError::Closed => {
                        tracing::debug!(subscription = %id, reason = err.as_label(), "subscriber gone")
                    }
                    _ => tracing::warn!(
                        subscription = %id,
                        seq = event.seq,
                        reason = err.as_label(),
                        "{}; subscriber detached",
                        err.as_message()
                    ),
                }
            }
        }
        delivery
    }

    /// Detaches every subscriber and refuses new ones. Returns how many were attached.
    pub fn close(&self) -> usize {
        let drained: Vec<(SubscriptionId, Slot)> = {
            let mut reg = self.registry();
            reg.closed = true;
            reg.slots.drain().collect()
        };
        for (_, slot) in &drained {
            slot.attached.store(false, Ordering::Release);
        }
        drained.len()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.registry().closed
    }

    /// Number of currently attached subscribers.
    pub fn len(&self) -> usize {
        self.registry().slots.len()
    }

    /// Returns `true` if no subscriber is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted identifiers of the attached subscribers.
    pub fn ids(&self) -> Vec<SubscriptionId> {
        let mut ids: Vec<SubscriptionId> = self.registry().slots.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

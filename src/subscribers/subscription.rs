//! # Subscription: one consumer's attachment to the fan-out stage.
//!
//! A [`Subscription`] is returned by [`Bridge::subscribe`](crate::Bridge::subscribe).
//! It owns the receiving end of a bounded per-subscriber queue and yields events
//! emitted after it attached, in emission order.
//!
//! ## State machine
//! ```text
//! Attached ──► Detached   (terminal)
//!    │
//!    ├─ detach() / Bridge::unsubscribe()
//!    ├─ handle dropped (session closed)
//!    ├─ queue full or closed (fan-out detaches it)
//!    └─ Bridge::shutdown()
//! ```
//! A reconnecting client gets a brand-new subscription.
//!
//! ## Rules
//! - Events already queued when the subscription detaches can still be received;
//!   afterwards `recv()` returns `None`.
//! - `detach()` is idempotent; dropping the handle detaches it.

use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::fanout::FanOut;
use crate::events::Event;

/// Process-unique identifier of a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    /// Raw numeric value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Lifecycle state of a [`Subscription`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Receiving every newly emitted event.
    Attached,
    /// No longer receiving; terminal.
    Detached,
}

/// Pull-style handle yielding events until it is detached.
///
/// Also implements [`Stream`], which is how the SSE adapter consumes it.
pub struct Subscription {
    id: SubscriptionId,
    rx: mpsc::Receiver<Arc<Event>>,
    attached: Arc<AtomicBool>,
    fanout: Weak<FanOut>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        rx: mpsc::Receiver<Arc<Event>>,
        attached: Arc<AtomicBool>,
        fanout: Weak<FanOut>,
    ) -> Self {
        Self {
            id,
            rx,
            attached,
            fanout,
        }
    }

    /// Identifier of this subscription.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> SubscriptionState {
        if self.attached.load(Ordering::Acquire) {
            SubscriptionState::Attached
        } else {
            SubscriptionState::Detached
        }
    }

    /// Shorthand for `state() == SubscriptionState::Attached`.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state() == SubscriptionState::Attached
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the subscription is detached and its queue is empty.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.rx.recv().await
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Event>> {
        self.rx.try_recv().ok()
    }

    /// Detaches from the fan-out stage. Idempotent.
    ///
    /// Events emitted afterwards are not delivered; events already queued stay
    /// receivable.
    pub fn detach(&mut self) {
        if let Some(fanout) = self.fanout.upgrade() {
            fanout.detach(self.id);
        }
        self.attached.store(false, Ordering::Release);
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl Stream for Subscription {
    type Item = Arc<Event>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

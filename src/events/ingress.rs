//! # Ingress: the handoff queue between producers and the pump.
//!
//! [`Publisher`] is the producer half, [`IngressQueue`] the consumer half held
//! by the pump. Both are backed by an unbounded [`tokio::sync::mpsc`] channel.
//!
//! ## Architecture
//! ```text
//! Producers (many, any thread):      Consumer (one):
//!   create #1 ──┐
//!   create #2 ──┼──► Publisher ──► [unbounded FIFO] ──► IngressQueue ──► Pump
//!   create #N ──┘   (position++)                        (dequeue/drain)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits and never fails back to the caller.
//! - **FIFO**: entries leave in the order they entered; nothing is duplicated or reordered.
//! - **Positions**: each publish takes the next ingress position. Subscriptions remember
//!   the position current at attach time and never see entries at or below it, so
//!   "published before subscribe" means "never delivered", whatever the pump latency.
//! - **Closed ingress**: once the queue is dropped, publishes are dropped with a debug log.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::event::Event;

/// One queued event together with its ingress position.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// 1-based position assigned at publish time.
    pub position: u64,
    /// The event itself.
    pub event: Event,
}

/// Creates a connected producer/consumer pair.
pub fn channel() -> (Publisher, IngressQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    let published = Arc::new(AtomicU64::new(0));
    (Publisher { tx, published }, IngressQueue { rx })
}

/// Producer handle of the ingress queue.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately, from sync or async code.
/// - **Fire-and-forget**: no delivery guarantee, no error surfaced to the caller.
/// - **Cloneable**: cheap to clone (internally `Arc`-backed).
#[derive(Clone, Debug)]
pub struct Publisher {
    tx: mpsc::UnboundedSender<Envelope>,
    published: Arc<AtomicU64>,
}

impl Publisher {
    /// Enqueues an event for the pump.
    ///
    /// Takes the next ingress position, then hands the event over. If the bridge
    /// has already been torn down, the event is dropped.
    pub fn publish(&self, event: Event) {
        let position = self.published.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(mpsc::error::SendError(env)) = self.tx.send(Envelope { position, event }) {
            tracing::debug!(
                seq = env.event.seq,
                position = env.position,
                "ingress closed; event dropped"
            );
        }
    }

    /// Position of the most recent publish (0 before the first one).
    #[inline]
    pub fn position(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    /// Returns `true` once the consumer half is gone.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of the ingress queue, owned by the pump.
#[derive(Debug)]
pub struct IngressQueue {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl IngressQueue {
    /// Waits for the next entry.
    ///
    /// Returns `None` when `cancel` fires or every [`Publisher`] has been dropped.
    /// Cancellation wins over a ready entry, so a cancelled pump stops waiting
    /// immediately; queued entries are then collected with [`drain`](Self::drain).
    pub async fn dequeue(&mut self, cancel: &CancellationToken) -> Option<Envelope> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            env = self.rx.recv() => env,
        }
    }

    /// Removes and returns every entry already queued, without waiting.
    pub fn drain(&mut self) -> Vec<Envelope> {
        let mut out = Vec::new();
        while let Ok(env) = self.rx.try_recv() {
            out.push(env);
        }
        out
    }

    /// Closes the queue for new entries; already queued ones stay drainable.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::Profile;

    fn ev(id: &str) -> Event {
        Event::profile_created(Profile::new(id, format!("{id}@email.com")))
    }

    #[tokio::test]
    async fn test_fifo_and_positions() {
        let (publisher, mut queue) = channel();
        let token = CancellationToken::new();

        publisher.publish(ev("a"));
        publisher.publish(ev("b"));
        publisher.publish(ev("c"));
        assert_eq!(publisher.position(), 3);

        let mut ids = Vec::new();
        for expected in 1..=3 {
            let env = queue.dequeue(&token).await.expect("queued entry");
            assert_eq!(env.position, expected);
            ids.push(env.event.profile_id().to_string());
        }
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cancel_stops_waiting() {
        let (_publisher, mut queue) = channel();
        let token = CancellationToken::new();
        token.cancel();
        assert!(queue.dequeue(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_wins_over_ready_entry_and_drain_keeps_it() {
        let (publisher, mut queue) = channel();
        let token = CancellationToken::new();
        publisher.publish(ev("pending"));
        token.cancel();

        assert!(queue.dequeue(&token).await.is_none());
        let rest = queue.drain();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].event.profile_id(), "pending");
    }

    #[tokio::test]
    async fn test_all_publishers_dropped_ends_queue() {
        let (publisher, mut queue) = channel();
        drop(publisher);
        let token = CancellationToken::new();
        assert!(queue.dequeue(&token).await.is_none());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_publish_after_close_is_silent() {
        let (publisher, queue) = channel();
        drop(queue);
        assert!(publisher.is_closed());
        publisher.publish(ev("late"));
        assert_eq!(publisher.position(), 1);
    }

    #[test]
    fn test_publish_from_plain_threads() {
        let (publisher, mut queue) = channel();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let p = publisher.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        p.publish(ev(&format!("{t}-{i}")));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("producer thread");
        }

        let all = queue.drain();
        assert_eq!(all.len(), 200);
        for t in 0..4 {
            let prefix = format!("{t}-");
            let order: Vec<usize> = all
                .iter()
                .filter_map(|e| e.event.profile_id().strip_prefix(&prefix))
                .map(|n| n.parse().expect("numeric suffix"))
                .collect();
            assert_eq!(order, (0..50).collect::<Vec<_>>());
        }
    }
}

//! # Pump: moves events from the ingress queue into the fan-out stage.
//!
//! The pump is the only writer into the [`FanOut`], so there is a single global
//! emission order no matter how many producers enqueue concurrently.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► dequeue(token)              (suspends while the queue is empty)
//!   │     ├─ Some(entry) ──► fanout.emit(entry)
//!   │     ├─ None + cancelled ──► drain queued entries into fanout ──► exit Cancelled
//!   │     └─ None + ingress closed ──► exit IngressClosed
//! }
//! ```
//!
//! ## Rules
//! - Cancellation is the shutdown signal; it is never retried or swallowed.
//! - Entries already queued when cancellation arrives are still emitted.
//! - The loop never spins: its only suspension point is the empty queue.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::events::{Envelope, IngressQueue};
use crate::subscribers::FanOut;

/// Why the pump stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PumpExit {
    /// Shutdown requested; `drained` entries were flushed on the way out.
    Cancelled {
        /// Entries emitted after cancellation.
        drained: usize,
    },
    /// Every publisher was dropped and the queue ran dry.
    IngressClosed,
}

/// Single-consumer loop bridging the ingress queue and the fan-out stage.
pub struct Pump {
    queue: IngressQueue,
    fanout: Arc<FanOut>,
    emitted: u64,
}

impl Pump {
    /// Creates a pump over the given queue and fan-out stage.
    pub fn new(queue: IngressQueue, fanout: Arc<FanOut>) -> Self {
        Self {
            queue,
            fanout,
            emitted: 0,
        }
    }

    /// Runs until `token` is cancelled or the ingress closes.
    pub async fn run(mut self, token: CancellationToken) -> PumpExit {
        tracing::debug!("pump started");

        let exit = loop {
            match self.queue.dequeue(&token).await {
                Some(env) => self.emit(env),
                None if token.is_cancelled() => {
                    self.queue.close();
                    let pending = self.queue.drain();
                    let drained = pending.len();
                    for env in pending {
                        self.emit(env);
                    }
                    break PumpExit::Cancelled { drained };
                }
                None => break PumpExit::IngressClosed,
            }
        };

        tracing::debug!(emitted = self.emitted, ?exit, "pump stopped");
        exit
    }

    fn emit(&mut self, env: Envelope) {
        let seq = env.event.seq;
        let delivery = self.fanout.emit(env.position, Arc::new(env.event));
        self.emitted += 1;
        tracing::trace!(
            seq,
            position = env.position,
            delivered = delivery.delivered,
            skipped = delivery.skipped,
            detached = delivery.detached,
            "event emitted"
        );
    }
}

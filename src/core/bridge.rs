//! # Bridge: the one live feed of a process.
//!
//! The [`Bridge`] owns the ingress queue, the pump task and the single
//! [`FanOut`] stage. Producers call [`publish`](Bridge::publish); every transport
//! adapter calls [`subscribe`](Bridge::subscribe) once per connection on the same
//! bridge instance.
//!
//! ## High-level architecture
//! ```text
//! Producers (any thread):
//!   ProfileService::create ── publish(Event) ──► Publisher ──► [unbounded FIFO]
//!                                                                    │
//! Pump task (one):                                                   ▼
//!   dequeue ──► FanOut::emit ─┬──► [queue S1] ──► ws session 1
//!                             ├──► [queue S2] ──► sse stream 1
//!                             └──► [queue SN] ──► sink worker ──► Subscribe::on_event
//!
//! Shutdown path:
//!   shutdown()
//!     └─► token.cancel()          → pump stops waiting, drains queued entries, exits
//!     └─► fanout.close()          → every subscription detached (streams end)
//!     └─► join sink workers       → within cfg.grace, otherwise aborted
//!            ├─ all joined        → Ok(())
//!            └─ deadline exceeded → RuntimeError::GraceExceeded { stuck }
//! ```
//!
//! ## Example
//! ```rust
//! use profile_feed::{Bridge, Config, Event, Profile};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::builder(Config::default()).build();
//!
//!     let mut sub = bridge.subscribe();
//!     bridge.publish(Event::profile_created(Profile::new("1", "a@email.com")));
//!
//!     let ev = sub.recv().await.expect("event");
//!     assert_eq!(ev.profile_id(), "1");
//!
//!     bridge.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{builder::BridgeBuilder, config::Config, pump::PumpExit};
use crate::{
    error::RuntimeError,
    events::{Event, Publisher},
    subscribers::{
        FanOut, SinkExit, Subscribe, Subscription, SubscriptionId,
        worker::{self, panic_message},
    },
};

/// Handle to a running sink worker.
struct SinkHandle {
    name: &'static str,
    id: SubscriptionId,
    join: JoinHandle<SinkExit>,
}

/// Producer/consumer bridge with a single shared fan-out stage.
pub struct Bridge {
    cfg: Config,
    publisher: Publisher,
    fanout: Arc<FanOut>,
    token: CancellationToken,
    pump: Mutex<Option<JoinHandle<PumpExit>>>,
    sinks: Mutex<Vec<SinkHandle>>,
}

impl Bridge {
    /// Returns a builder for a new bridge.
    pub fn builder(cfg: Config) -> BridgeBuilder {
        BridgeBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        publisher: Publisher,
        fanout: Arc<FanOut>,
        token: CancellationToken,
        pump: JoinHandle<PumpExit>,
    ) -> Self {
        Self {
            cfg,
            publisher,
            fanout,
            token,
            pump: Mutex::new(Some(pump)),
            sinks: Mutex::new(Vec::new()),
        }
    }

    /// Configuration this bridge was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Hands one event to the feed. Fire-and-forget; never blocks, never fails.
    pub fn publish(&self, event: Event) {
        self.publisher.publish(event);
    }

    /// Returns a cloneable producer handle for code that should not hold the bridge.
    pub fn publisher(&self) -> Publisher {
        self.publisher.clone()
    }

    /// Attaches a new pull-style subscriber.
    ///
    /// The subscription starts empty: it receives only events published after
    /// this call. After [`shutdown`](Self::shutdown) it starts detached.
    pub fn subscribe(&self) -> Subscription {
        self.fanout.attach(self.publisher.position())
    }

    /// Detaches a subscription (paired with [`subscribe`](Self::subscribe)).
    pub fn unsubscribe(&self, mut subscription: Subscription) {
        subscription.detach();
    }

    /// Detaches a subscriber by id (e.g. a sink). Idempotent.
    pub fn detach(&self, id: SubscriptionId) -> bool {
        self.fanout.detach(id)
    }

    /// Attaches a push-style sink and spawns its worker.
    pub fn attach_sink(&self, sink: Arc<dyn Subscribe>) -> SubscriptionId {
        let sub = self
            .fanout
            .attach_with_capacity(self.publisher.position(), sink.queue_capacity());
        let id = sub.id();
        let name = sink.name();
        let join = worker::spawn(sink, sub);

        let mut sinks = self.sinks();
        sinks.retain(|s| !s.join.is_finished());
        sinks.push(SinkHandle { name, id, join });
        id
    }

    /// Number of currently attached subscribers (pull and push).
    pub fn subscriber_count(&self) -> usize {
        self.fanout.len()
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) has been called.
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stops the feed.
    ///
    /// Cancels the pump (which flushes what is already queued), detaches every
    /// subscriber and waits for sink workers, all within [`Config::grace`].
    /// Calling it again is a no-op.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.token.cancel();
        let deadline = self.cfg.grace_period().map(|g| Instant::now() + g);
        let mut stuck = Vec::new();
        let mut pump_panic = None;

        let pump = self.pump().take();
        if let Some(join) = pump {
            match join_until(join, deadline).await {
                Some(Ok(exit)) => tracing::info!(?exit, "pump joined"),
                Some(Err(err)) => pump_panic = panicked(err),
                None => stuck.push("pump".to_string()),
            }
        }

        let detached = self.fanout.close();
        tracing::info!(detached, "feed closed");

        let sinks = std::mem::take(&mut *self.sinks());
        for sink in sinks {
            match join_until(sink.join, deadline).await {
                Some(Ok(exit)) => {
                    tracing::debug!(sink = sink.name, subscription = %sink.id, ?exit, "sink joined")
                }
                Some(Err(err)) => {
                    tracing::warn!(sink = sink.name, subscription = %sink.id, error = %err, "sink worker failed")
                }
                None => stuck.push(format!("sink:{}", sink.name)),
            }
        }

        if let Some(reason) = pump_panic {
            return Err(RuntimeError::PumpPanicked { reason });
        }
        if !stuck.is_empty() {
            return Err(RuntimeError::GraceExceeded {
                grace: self.cfg.grace,
                stuck,
            });
        }
        Ok(())
    }

    fn pump(&self) -> MutexGuard<'_, Option<JoinHandle<PumpExit>>> {
        self.pump.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sinks(&self) -> MutexGuard<'_, Vec<SinkHandle>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Awaits `join` until `deadline`; aborts it and returns `None` when the deadline passes.
///
/// With no deadline the task is only collected if it has already finished.
async fn join_until<T>(
    join: JoinHandle<T>,
    deadline: Option<Instant>,
) -> Option<Result<T, JoinError>> {
    let abort = join.abort_handle();
    let deadline = deadline.unwrap_or_else(Instant::now);
    match tokio::time::timeout_at(deadline, join).await {
        Ok(res) => Some(res),
        Err(_elapsed) => {
            abort.abort();
            None
        }
    }
}

fn panicked(err: JoinError) -> Option<String> {
    if err.is_panic() {
        Some(panic_message(&*err.into_panic()))
    } else {
        None
    }
}

//! # Push-style event sink trait.
//!
//! Provides [`Subscribe`], an extension point for plugging handlers directly into
//! the feed instead of pulling from a [`Subscription`](crate::Subscription).
//!
//! Each sink gets:
//! - **Its own subscription** with a bounded queue (capacity via [`Subscribe::queue_capacity`])
//! - **A dedicated worker task** that drains the queue and calls [`Subscribe::on_event`]
//! - **Failure isolation**: an `Err` or a panic detaches this sink only
//!
//! ## Architecture
//! ```text
//! FanOut ──► [bounded queue] ──► worker task ──► sink.on_event()
//!                                       ├─► Err(DeliveryError) → detach
//!                                       └─► panic caught       → detach
//! ```
//!
//! ## Rules
//! - A slow sink only affects its own queue; overflow detaches it.
//! - Events are processed sequentially (FIFO) per sink.
//! - Sinks never block the pump or each other.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use profile_feed::{DeliveryError, Event, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &Event) -> Result<(), DeliveryError> {
//!         println!("created {}", ev.profile_id());
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::events::Event;

/// Event sink attached to the feed through a dedicated worker.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Return `Err` when the downstream target is gone; the sink is then detached.
/// - Slow processing affects only this sink's queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the sink's worker task, never from the pump.
    /// Returning `Err` detaches the sink; so does a panic.
    async fn on_event(&self, event: &Event) -> Result<(), DeliveryError>;

    /// Returns the sink name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose; override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this sink.
    ///
    /// When the queue is full the sink is detached. The runtime clamps capacity
    /// to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

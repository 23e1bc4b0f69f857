//! # profile-feed
//!
//! **profile-feed** is a profile service whose core is a live event feed: every
//! profile created through the service is announced, in order, to every
//! subscriber attached at that moment.
//!
//! The crate is split into a transport-independent core (the [`Bridge`]) and the
//! collaborators around it: the profile model and store, and an axum HTTP
//! surface with WebSocket and SSE adapters (feature `server`).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ POST handler │   │ POST handler │   │ other thread │
//!     │  (request 1) │   │  (request 2) │   │ (any caller) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ ProfileService::create / Publisher::publish (never blocks)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                 Ingress (unbounded FIFO, positioned)              │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │          Pump          │
//!                       │   (single consumer)    │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │         FanOut         │
//!                       │ (per-subscriber queues)│
//!                       └───┬────────┬────────┬──┘
//!                           ▼        ▼        ▼
//!                      ws session  sse body  sink worker
//!                                             ▼
//!                                       Subscribe::on_event()
//! ```
//!
//! ### Delivery rules
//! ```text
//! publish ──► position p
//! subscribe at position a ──► receives exactly the entries with p > a, in ingress order
//!
//! queue full   ─► subscriber detached (Lagging), others unaffected
//! queue closed ─► subscriber detached (Closed)
//! shutdown     ─► pump drains ingress, fan-out closes, every subscriber ends
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                           |
//! |-------------------|--------------------------------------------------------------|----------------------------------------------|
//! | **Feed**          | Publish events, attach and detach subscribers, shut down.    | [`Bridge`], [`Publisher`], [`Subscription`]  |
//! | **Subscriber API**| Push-style consumers with their own worker.                  | [`Subscribe`]                                |
//! | **Errors**        | Typed errors for shutdown and delivery.                      | [`RuntimeError`], [`DeliveryError`]          |
//! | **Profiles**      | Model, store and the use cases that publish events.          | [`Profile`], [`profiles::ProfileService`]    |
//! | **Configuration** | Queue capacity and shutdown grace.                           | [`Config`]                                   |
//!
//! ## Optional features
//! - `server` _(default)_: axum router with REST, WebSocket and SSE endpoints, and the binary.
//! - `logging`: exports a simple built-in [`LogWriter`] sink.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use profile_feed::{Bridge, Config, Event, Profile};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::builder(Config::default()).build();
//!
//!     let mut feed = bridge.subscribe();
//!     bridge.publish(Event::profile_created(Profile::new("1", "a@email.com")));
//!
//!     let ev = tokio::time::timeout(Duration::from_secs(1), feed.recv())
//!         .await?
//!         .expect("event delivered");
//!     assert_eq!(ev.profile_id(), "1");
//!
//!     bridge.shutdown().await?;
//!     assert!(feed.recv().await.is_none());
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
pub mod profiles;
mod subscribers;

#[cfg(feature = "server")]
pub mod server;

// ---- Public re-exports ----

pub use core::{Bridge, BridgeBuilder, Config, Pump, PumpExit, wait_for_shutdown_signal};
pub use error::{DeliveryError, RuntimeError};
pub use events::{Envelope, Event, IngressQueue, Publisher};
pub use profiles::Profile;
pub use subscribers::{
    Delivery, FanOut, SinkExit, Subscribe, Subscription, SubscriptionId, SubscriptionState,
};

// Optional: expose a simple built-in logger sink (demo/reference).
// Enable with: `--features logging`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

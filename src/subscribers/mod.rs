//! # Subscribers of the live feed.
//!
//! This module owns everything downstream of the pump: the fan-out stage,
//! the pull-style [`Subscription`] handle and the push-style [`Subscribe`] trait.
//!
//! ## Architecture
//! ```text
//! Pump ── emit(event) ──► FanOut ──► Subscription (ws session)
//!                            ├─────► Subscription (sse stream)
//!                            └─────► Subscription ──► sink worker ──► Subscribe::on_event
//! ```
//!
//! ## Subscriber kinds
//! - **Pull**: transport adapters hold a [`Subscription`] per connection and
//!   read it with `recv()` or as a `Stream`.
//! - **Push**: a [`Subscribe`] implementation attached through
//!   [`Bridge::attach_sink`](crate::Bridge::attach_sink) gets its own worker.

mod fanout;
mod subscriber;
mod subscription;
pub(crate) mod worker;

#[cfg(feature = "logging")]
mod embedded;

pub use fanout::{Delivery, FanOut};
pub use subscriber::Subscribe;
pub use subscription::{Subscription, SubscriptionId, SubscriptionState};
pub use worker::SinkExit;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;

//! Feed events: data model and ingress queue.
//!
//! This module groups the event **data model** and the **ingress** used to hand
//! events from producers to the pump.
//!
//! ## Contents
//! - [`Event`] immutable "profile created" notification
//! - [`Publisher`], [`IngressQueue`] the two halves of the handoff queue
//!
//! ## Quick reference
//! - **Producers**: `ProfileService::create` (through a cloned [`Publisher`]), tests.
//! - **Consumer**: the pump, see `core/pump.rs`.

mod event;
pub(crate) mod ingress;

pub use event::Event;
pub use ingress::{Envelope, IngressQueue, Publisher};

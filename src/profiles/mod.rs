//! Profile records: model, storage, use cases and demo data.
//!
//! These are the collaborators around the feed. The only coupling to the core is
//! [`ProfileService::create`], which publishes one event per saved profile.

mod model;
mod seed;
mod service;
mod store;

pub use model::Profile;
pub use seed::{DEMO_NAMES, seed_demo};
pub use service::ProfileService;
pub use store::{MemoryStore, ProfileStore, StoreError};

//! Runtime core: the bridge, its pump and lifecycle.
//!
//! The only public entry point from this module is [`Bridge`], which owns the
//! ingress queue, the pump task and the fan-out stage, and tears them down on
//! [`Bridge::shutdown`].
//!
//! Internal modules:
//! - [`bridge`]: public API (publish/subscribe/shutdown);
//! - [`builder`]: wires ingress, fan-out and pump, spawns sink workers;
//! - [`pump`]: single consumer moving events from ingress into the fan-out stage;
//! - [`config`]: bridge settings;
//! - [`shutdown`]: cross-platform termination signal handling.

mod bridge;
mod builder;
mod config;
mod pump;
mod shutdown;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use config::Config;
pub use pump::{Pump, PumpExit};
pub use shutdown::wait_for_shutdown_signal;

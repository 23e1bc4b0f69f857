//! # Built-in sinks
//!
//! Small, self-contained implementations useful for demos.
//!
//! - [`LogWriter`]: traces each delivered event (demo/debug).

mod log;

pub use log::LogWriter;

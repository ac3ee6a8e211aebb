//! Shared `tracing` setup for the bip322-simple binaries.
//!
//! Standard output is reserved for program results, so console logs go to
//! standard error.

pub mod logging;

pub use logging::{init, LogConfig, LogFormat, LogOutput};

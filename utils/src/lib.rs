//! Shared utilities for the Blackhole workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};

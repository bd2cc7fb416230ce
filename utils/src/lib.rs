//! Shared utilities for licverify.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_local, format_timestamp};

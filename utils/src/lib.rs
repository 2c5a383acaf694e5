//! Shared utilities for duck services.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{describe_restriction, format_duration};

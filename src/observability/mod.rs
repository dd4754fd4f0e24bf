//! Observability module
//!
//! Structured logging for `Reconify` commands.

pub mod logging;

pub use logging::{LogFormat, LogSettings, init_logging};

//! Utility modules for the Gateway
//!
//! - **error**: the crate-wide error type and its HTTP mapping
//! - **logging**: tracing subscriber setup and log redaction helpers
//! - **time**: the clock abstraction used by time-windowed components

pub mod error;
pub mod logging;
pub mod time;

pub use logging::{init_tracing, token_fingerprint};
pub use time::{Clock, ManualClock, SharedClock, SystemClock};

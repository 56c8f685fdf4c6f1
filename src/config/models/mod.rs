//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod auth;
pub mod gateway;
pub mod logging;
pub mod rate_limit;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use auth::*;
pub use gateway::*;
pub use logging::*;
pub use rate_limit::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default sliding window length, one hour
pub fn default_window_secs() -> u64 {
    3600
}

/// Default number of requests admitted per window
pub fn default_max_requests() -> u64 {
    60
}

pub fn default_rate_limit_prefix() -> String {
    "RATE_LIMIT".to_string()
}

pub fn default_jwt_expiration() -> u64 {
    3600
}

pub fn default_cookie_name() -> String {
    "token".to_string()
}

pub fn default_revocation_prefix() -> String {
    "token".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

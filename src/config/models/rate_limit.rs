//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Sliding-window rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Requests admitted per client and route within one window
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    /// Key namespace for window entries
    #[serde(default = "default_rate_limit_prefix")]
    pub key_prefix: String,
    /// Number of reverse proxies in front of the gateway whose
    /// `X-Forwarded-For` entries are trusted. Zero uses the TCP peer.
    #[serde(default)]
    pub trusted_proxy_hops: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            key_prefix: default_rate_limit_prefix(),
            trusted_proxy_hops: 0,
        }
    }
}

impl RateLimitConfig {
    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window_secs == 0 {
            return Err("Rate limit window cannot be 0".to_string());
        }
        if self.max_requests == 0 {
            return Err("Rate limit max_requests cannot be 0".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("Rate limit key prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

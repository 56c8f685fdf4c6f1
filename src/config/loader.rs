//! Configuration loading utilities
//!
//! Environment variables override values read from the configuration file.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

impl GatewayConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server configuration
        if let Some(host) = lookup("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("GATEWAY_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse_var("port", &port)?;
        }

        // Redis configuration
        if let Some(url) = lookup("REDIS_URL") {
            self.storage.redis.url = url;
            self.storage.redis.enabled = true;
        }
        if let Some(enabled) = lookup("REDIS_ENABLED") {
            self.storage.redis.enabled = parse_var("redis enabled flag", &enabled)?;
        }

        // Auth configuration
        if let Some(secret) = lookup("JWT_SECRET").or_else(|| lookup("JWT_KEY")) {
            self.auth.jwt_secret = secret;
        }
        if let Some(exp) = lookup("JWT_EXPIRATION") {
            self.auth.jwt_expiration = parse_var("JWT expiration", &exp)?;
        }
        if let Some(secure) = lookup("COOKIE_SECURE") {
            self.auth.cookie_secure = parse_var("cookie secure flag", &secure)?;
        }
        if let Some(domain) = lookup("COOKIE_DOMAIN") {
            self.auth.cookie_domain = Some(domain).filter(|d| !d.is_empty());
        }

        // Rate limiting configuration
        if let Some(enabled) = lookup("RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = parse_var("rate limit enabled flag", &enabled)?;
        }
        if let Some(window) = lookup("RATE_LIMIT_WINDOW_SECS") {
            self.rate_limit.window_secs = parse_var("rate limit window", &window)?;
        }
        if let Some(max) = lookup("RATE_LIMIT_MAX_REQUESTS") {
            self.rate_limit.max_requests = parse_var("rate limit max requests", &max)?;
        }
        if let Some(hops) = lookup("TRUSTED_PROXY_HOPS") {
            self.rate_limit.trusted_proxy_hops = parse_var("trusted proxy hops", &hops)?;
        }

        debug!("Environment overrides applied");
        Ok(())
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e)))
}

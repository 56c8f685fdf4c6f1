//! Authentication configuration

use super::*;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Minimum JWT secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(default = "generate_ephemeral_jwt_secret")]
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// Name of the session cookie carrying the token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure`
    #[serde(default)]
    pub cookie_secure: bool,
    /// Optional `Domain` attribute of the session cookie
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Key namespace for revoked tokens
    #[serde(default = "default_revocation_prefix")]
    pub revocation_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_ephemeral_jwt_secret(),
            jwt_expiration: default_jwt_expiration(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            cookie_domain: None,
            revocation_prefix: default_revocation_prefix(),
        }
    }
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(format!(
                "JWT secret must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.jwt_expiration == 0 {
            return Err("JWT expiration cannot be 0".to_string());
        }

        if self.cookie_name.is_empty() {
            return Err("Cookie name cannot be empty".to_string());
        }

        if self.revocation_prefix.is_empty() {
            return Err("Revocation key prefix cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Random per-process secret used when none is configured.
///
/// Tokens signed with it stop verifying after a restart.
fn generate_ephemeral_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Warn about insecure but valid settings
pub fn warn_insecure_config(config: &AuthConfig) {
    if !config.cookie_secure {
        warn!("Session cookie is not marked Secure. Enable cookie_secure behind HTTPS.");
    }
}

//! Revoked-token blocklist
//!
//! Logout writes `"{prefix}:{raw token}"` with an absolute expiry equal to the
//! token's own `exp`, so an entry never outlives the token it blocks.

use crate::storage::{SharedStore, Transaction};
use crate::utils::error::Result;
use crate::utils::logging::token_fingerprint;
use tracing::debug;

/// Marker stored under a revoked token's key
pub const REVOKED_MARKER: &str = "Blocked";

/// Token revocation guard
#[derive(Debug, Clone)]
pub struct TokenRevocation {
    store: SharedStore,
    prefix: String,
}

impl TokenRevocation {
    pub fn new(store: SharedStore, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Store key for `raw_token`
    pub fn key(&self, raw_token: &str) -> String {
        format!("{}:{}", self.prefix, raw_token)
    }

    /// Block `raw_token` until `expires_at` (Unix seconds).
    ///
    /// Revoking an already revoked token rewrites the same entry. An
    /// `expires_at` in the past leaves nothing behind.
    pub async fn revoke(&self, raw_token: &str, expires_at: i64) -> Result<()> {
        let key = self.key(raw_token);
        let tx = Transaction::new()
            .set(&key, REVOKED_MARKER)
            .expire_at(&key, expires_at);
        let replies = self.store.exec(tx.clone()).await?;
        tx.check_replies(&replies)?;

        debug!(
            token = %token_fingerprint(raw_token),
            expires_at,
            "Token revoked"
        );
        Ok(())
    }

    /// Whether `raw_token` is on the blocklist. Store errors are returned,
    /// the caller decides how to treat them.
    pub async fn is_revoked(&self, raw_token: &str) -> Result<bool> {
        self.store.exists(&self.key(raw_token)).await
    }
}

//! Application state shared across HTTP handlers

use crate::auth::{Authenticator, JwtHandler, SharedUserDirectory, TokenRevocation};
use crate::config::Config;
use crate::core::rate_limiter::SlidingWindowLimiter;
use crate::storage::SharedStore;
use crate::utils::time::SharedClock;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Built once at startup from an already connected store. The store's
/// lifecycle stays with the caller.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Key-value store shared by the limiter and the blocklist
    pub store: SharedStore,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub jwt: Arc<JwtHandler>,
    pub revocation: TokenRevocation,
    pub authenticator: Arc<Authenticator>,
    pub users: SharedUserDirectory,
    pub clock: SharedClock,
}

impl AppState {
    /// Wire the limiter, token handling and guard around `store`
    pub fn new(
        config: Config,
        store: SharedStore,
        users: SharedUserDirectory,
        clock: SharedClock,
    ) -> Self {
        let gateway = &config.gateway;

        let limiter = Arc::new(SlidingWindowLimiter::new(
            store.clone(),
            clock.clone(),
            gateway.rate_limit.clone(),
        ));
        let jwt = Arc::new(JwtHandler::new(&gateway.auth));
        let revocation = TokenRevocation::new(store.clone(), gateway.auth.revocation_prefix.clone());
        let authenticator = Arc::new(Authenticator::new(
            jwt.clone(),
            revocation.clone(),
            users.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            limiter,
            jwt,
            revocation,
            authenticator,
            users,
            clock,
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend())
            .field("limiter", &self.limiter.config())
            .finish_non_exhaustive()
    }
}

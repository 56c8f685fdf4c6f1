//! Server builder and run_server function

use crate::auth::{InMemoryUserDirectory, SharedUserDirectory};
use crate::config::Config;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::storage::SharedStore;
use crate::utils::error::{GatewayError, Result};
use crate::utils::time::{SharedClock, SystemClock};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    store: Option<SharedStore>,
    users: Option<SharedUserDirectory>,
    clock: Option<SharedClock>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the connected key-value store
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the account directory (in-memory when unset)
    pub fn with_users(mut self, users: SharedUserDirectory) -> Self {
        self.users = Some(users);
        self
    }

    /// Set the clock (system clock when unset)
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the application state
    pub fn build_state(self) -> Result<AppState> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| GatewayError::Config("A connected store is required".to_string()))?;
        let users = self
            .users
            .unwrap_or_else(|| Arc::new(InMemoryUserDirectory::new()));
        let clock = self.clock.unwrap_or_else(SystemClock::shared);

        Ok(AppState::new(config, store, users, clock))
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        Ok(HttpServer::new(self.build_state()?))
    }
}

/// Serve until shutdown on an already connected store
pub async fn run_server(config: Config, store: SharedStore) -> Result<()> {
    let address = config.server().address();

    let server = ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .build()?;

    info!("Server starting at: http://{}", address);
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   POST /auth/register - Customer registration");
    info!("   POST /auth/service/register - Service provider registration");
    info!("   POST /auth/admin/register - Administrator registration");
    info!("   POST /auth/login - Login");
    info!("   POST /auth/logout - Logout");
    info!("   GET  /auth/check - Session check");

    server.start().await
}

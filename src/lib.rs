//! # Bellespot Gateway
//!
//! Request gate for the Bellespot salon marketplace API.
//!
//! ## Features
//!
//! - **Sliding-window rate limiting** per client and route, stored as sorted
//!   sets in Redis (or in process for development), failing open when the
//!   store is unavailable
//! - **Cookie JWT authentication** with user, service provider and admin guards
//! - **Logout revocation**: revoked tokens stay blocked until their own expiry
//!   and then disappear from the store
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use bellespot_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::rate_limiter::{RateLimitDecision, SlidingWindowLimiter};
pub use storage::{KeyValueStore, MemoryStore, RedisStore, SharedStore, Transaction};
pub use utils::error::{GatewayError, Result};

use tracing::{info, warn};

/// Gateway process: a connected store plus the HTTP server built on it
pub struct Gateway {
    config: Config,
    store: SharedStore,
}

impl Gateway {
    /// Connect the configured store
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let store = storage::connect(&config.gateway.storage, utils::SystemClock::shared()).await?;

        Ok(Self { config, store })
    }

    /// Serve until shutdown, then release the store
    pub async fn run(self) -> Result<()> {
        let build = build_info();
        info!(
            version = build.version,
            git_hash = build.git_hash,
            store = self.store.backend(),
            "Starting Bellespot Gateway"
        );

        let served = server::run_server(self.config, self.store.clone()).await;

        if let Err(e) = storage::disconnect(&self.store).await {
            warn!("Failed to close store: {}", e);
        }

        served
    }

    /// Get the connected store
    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (Unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build information of this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

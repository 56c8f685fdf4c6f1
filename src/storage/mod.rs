//! Storage layer for the Gateway
//!
//! The key-value store holds both the rate-limit windows and the revoked-token
//! blocklist. Every backend implements [`KeyValueStore::exec`]; the single
//! commands are provided methods that run a one-op [`Transaction`].

/// In-process store
pub mod memory;
/// Redis store
pub mod redis;
/// Transaction and reply types
pub mod transaction;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;
pub use transaction::{Reply, ReplyKind, StoreOp, Transaction};

use crate::config::StorageConfig;
use crate::utils::error::{GatewayError, Result};
use crate::utils::time::SharedClock;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Shared store handle injected into the limiter and the revocation guard
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Key-value store contract
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Execute every op of `tx` as one atomic unit, returning one reply per op.
    async fn exec(&self, tx: Transaction) -> Result<Vec<Reply>>;

    /// Liveness check
    async fn ping(&self) -> Result<()>;

    /// Release connections. The store must not be used afterwards.
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Insert a member with a numeric score into a sorted set
    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<i64> {
        single(self, Transaction::new().zadd(key, score, member))
            .await?
            .into_int()
    }

    /// Remove all sorted set members scored within `[min, max]`
    async fn zrembyscore(&self, key: &str, min: f64, max: f64) -> Result<i64> {
        single(self, Transaction::new().zrembyscore(key, min, max))
            .await?
            .into_int()
    }

    /// Cardinality of a sorted set
    async fn zcard(&self, key: &str) -> Result<i64> {
        single(self, Transaction::new().zcard(key)).await?.into_int()
    }

    /// Members in score order with their scores
    async fn zrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        single(self, Transaction::new().zrange_withscores(key, start, stop))
            .await?
            .into_members()
    }

    /// Set or refresh a relative TTL
    async fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        single(self, Transaction::new().expire(key, seconds))
            .await?
            .into_bool()
    }

    /// Set a TTL to an absolute Unix timestamp
    async fn expire_at(&self, key: &str, timestamp: i64) -> Result<bool> {
        single(self, Transaction::new().expire_at(key, timestamp))
            .await?
            .into_bool()
    }

    /// Set a simple key to a marker value
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        single(self, Transaction::new().set(key, value))
            .await?
            .into_ok()
    }

    /// Key existence
    async fn exists(&self, key: &str) -> Result<bool> {
        single(self, Transaction::new().exists(key))
            .await?
            .into_bool()
    }
}

async fn single<S>(store: &S, tx: Transaction) -> Result<Reply>
where
    S: KeyValueStore + ?Sized,
{
    let mut replies = store.exec(tx).await?;
    if replies.len() != 1 {
        return Err(GatewayError::storage(format!(
            "malformed transaction result: expected 1 reply, got {}",
            replies.len()
        )));
    }
    replies
        .pop()
        .ok_or_else(|| GatewayError::storage("malformed transaction result: no reply"))
}

/// Open the configured backend.
///
/// Redis is used when enabled; an unreachable server yields a disconnected
/// store whose operations fail rather than an error here.
pub async fn connect(config: &StorageConfig, clock: SharedClock) -> Result<SharedStore> {
    if config.redis.enabled {
        let store = RedisStore::connect(&config.redis).await?;
        Ok(Arc::new(store))
    } else {
        info!("Redis disabled, using in-process store");
        Ok(Arc::new(MemoryStore::new(clock)))
    }
}

/// Close a store at shutdown
pub async fn disconnect(store: &SharedStore) -> Result<()> {
    info!("Closing {} store", store.backend());
    store.close().await
}

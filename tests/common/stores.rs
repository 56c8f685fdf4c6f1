//! Stores that misbehave on purpose

use async_trait::async_trait;
use bellespot_gateway::storage::{Reply, StoreOp};
use bellespot_gateway::{GatewayError, KeyValueStore, Result, Transaction};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Every operation fails as if the server were unreachable
#[derive(Debug, Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn exec(&self, _tx: Transaction) -> Result<Vec<Reply>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::storage("connection refused"))
    }

    async fn ping(&self) -> Result<()> {
        Err(GatewayError::storage("connection refused"))
    }
}

/// Answers every transaction with one reply of the wrong kind
#[derive(Debug, Default)]
pub struct MalformedStore;

#[async_trait]
impl KeyValueStore for MalformedStore {
    fn backend(&self) -> &'static str {
        "malformed"
    }

    async fn exec(&self, _tx: Transaction) -> Result<Vec<Reply>> {
        Ok(vec![Reply::Members(Vec::new())])
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Answers existence checks with "absent" and rejects every write
#[derive(Debug, Default)]
pub struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    fn backend(&self) -> &'static str {
        "read-only"
    }

    async fn exec(&self, tx: Transaction) -> Result<Vec<Reply>> {
        tx.ops()
            .iter()
            .map(|op| match op {
                StoreOp::Exists { .. } => Ok(Reply::Bool(false)),
                _ => Err(GatewayError::storage("READONLY replica")),
            })
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

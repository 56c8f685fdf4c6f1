//! Atomic multi-operation transactions
//!
//! A [`Transaction`] is an ordered batch of [`StoreOp`]s that a store executes
//! as one unit. Each op yields exactly one [`Reply`], in submission order.

use crate::utils::error::{GatewayError, Result};

/// A single store command
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Insert `member` with `score` into the sorted set at `key`
    ZAdd {
        key: String,
        score: f64,
        member: String,
    },
    /// Insert `member` only while the sorted set holds fewer than `limit`
    /// members, then set the key's TTL to `seconds`. Replies with the
    /// cardinality seen before the insert; nothing is written when it is at
    /// or above `limit`.
    ZAddIfBelow {
        key: String,
        score: f64,
        member: String,
        limit: u64,
        seconds: i64,
    },
    /// Remove `member` from the sorted set at `key`
    ZRem { key: String, member: String },
    /// Remove sorted set members whose score lies in `[min, max]`
    ZRemRangeByScore { key: String, min: f64, max: f64 },
    /// Cardinality of the sorted set at `key`
    ZCard { key: String },
    /// Members with scores by rank, lowest score first. Negative indexes
    /// count from the end.
    ZRangeWithScores { key: String, start: isize, stop: isize },
    /// Relative TTL in seconds
    Expire { key: String, seconds: i64 },
    /// Absolute expiry as a Unix timestamp in seconds
    ExpireAt { key: String, timestamp: i64 },
    /// Set a plain string value, clearing any TTL
    Set { key: String, value: String },
    /// Key existence
    Exists { key: String },
}

impl StoreOp {
    /// Key this op touches
    pub fn key(&self) -> &str {
        match self {
            StoreOp::ZAdd { key, .. }
            | StoreOp::ZAddIfBelow { key, .. }
            | StoreOp::ZRem { key, .. }
            | StoreOp::ZRemRangeByScore { key, .. }
            | StoreOp::ZCard { key }
            | StoreOp::ZRangeWithScores { key, .. }
            | StoreOp::Expire { key, .. }
            | StoreOp::ExpireAt { key, .. }
            | StoreOp::Set { key, .. }
            | StoreOp::Exists { key } => key,
        }
    }

    /// Kind of reply this op must produce
    pub fn reply_kind(&self) -> ReplyKind {
        match self {
            StoreOp::ZAdd { .. }
            | StoreOp::ZAddIfBelow { .. }
            | StoreOp::ZRem { .. }
            | StoreOp::ZRemRangeByScore { .. }
            | StoreOp::ZCard { .. } => ReplyKind::Int,
            StoreOp::ZRangeWithScores { .. } => ReplyKind::Members,
            StoreOp::Expire { .. } | StoreOp::ExpireAt { .. } | StoreOp::Exists { .. } => {
                ReplyKind::Bool
            }
            StoreOp::Set { .. } => ReplyKind::Ok,
        }
    }
}

/// Reply kinds, one per [`Reply`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Int,
    Bool,
    Ok,
    Members,
}

/// Result of one [`StoreOp`]
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Int(i64),
    Bool(bool),
    Ok,
    Members(Vec<(String, f64)>),
}

impl Reply {
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Int(_) => ReplyKind::Int,
            Reply::Bool(_) => ReplyKind::Bool,
            Reply::Ok => ReplyKind::Ok,
            Reply::Members(_) => ReplyKind::Members,
        }
    }

    pub fn into_int(self) -> Result<i64> {
        match self {
            Reply::Int(n) => Ok(n),
            other => Err(unexpected(ReplyKind::Int, &other)),
        }
    }

    pub fn into_bool(self) -> Result<bool> {
        match self {
            Reply::Bool(b) => Ok(b),
            other => Err(unexpected(ReplyKind::Bool, &other)),
        }
    }

    pub fn into_members(self) -> Result<Vec<(String, f64)>> {
        match self {
            Reply::Members(members) => Ok(members),
            other => Err(unexpected(ReplyKind::Members, &other)),
        }
    }

    pub fn into_ok(self) -> Result<()> {
        match self {
            Reply::Ok => Ok(()),
            other => Err(unexpected(ReplyKind::Ok, &other)),
        }
    }
}

fn unexpected(expected: ReplyKind, got: &Reply) -> GatewayError {
    GatewayError::storage(format!(
        "malformed transaction result: expected {:?} reply, got {:?}",
        expected,
        got.kind()
    ))
}

/// Ordered batch of store commands executed atomically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    ops: Vec<StoreOp>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, op: StoreOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn zadd(self, key: impl Into<String>, score: f64, member: impl Into<String>) -> Self {
        self.push(StoreOp::ZAdd {
            key: key.into(),
            score,
            member: member.into(),
        })
    }

    pub fn zadd_if_below(
        self,
        key: impl Into<String>,
        score: f64,
        member: impl Into<String>,
        limit: u64,
        seconds: i64,
    ) -> Self {
        self.push(StoreOp::ZAddIfBelow {
            key: key.into(),
            score,
            member: member.into(),
            limit,
            seconds,
        })
    }

    pub fn zrem(self, key: impl Into<String>, member: impl Into<String>) -> Self {
        self.push(StoreOp::ZRem {
            key: key.into(),
            member: member.into(),
        })
    }

    pub fn zrembyscore(self, key: impl Into<String>, min: f64, max: f64) -> Self {
        self.push(StoreOp::ZRemRangeByScore {
            key: key.into(),
            min,
            max,
        })
    }

    pub fn zcard(self, key: impl Into<String>) -> Self {
        self.push(StoreOp::ZCard { key: key.into() })
    }

    pub fn zrange_withscores(self, key: impl Into<String>, start: isize, stop: isize) -> Self {
        self.push(StoreOp::ZRangeWithScores {
            key: key.into(),
            start,
            stop,
        })
    }

    pub fn expire(self, key: impl Into<String>, seconds: i64) -> Self {
        self.push(StoreOp::Expire {
            key: key.into(),
            seconds,
        })
    }

    pub fn expire_at(self, key: impl Into<String>, timestamp: i64) -> Self {
        self.push(StoreOp::ExpireAt {
            key: key.into(),
            timestamp,
        })
    }

    pub fn set(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(StoreOp::Set {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn exists(self, key: impl Into<String>) -> Self {
        self.push(StoreOp::Exists { key: key.into() })
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Check that `replies` pairs up one-to-one with the submitted ops.
    pub fn check_replies(&self, replies: &[Reply]) -> Result<()> {
        if replies.len() != self.ops.len() {
            return Err(GatewayError::storage(format!(
                "malformed transaction result: {} ops, {} replies",
                self.ops.len(),
                replies.len()
            )));
        }

        for (op, reply) in self.ops.iter().zip(replies) {
            if op.reply_kind() != reply.kind() {
                return Err(unexpected(op.reply_kind(), reply));
            }
        }

        Ok(())
    }
}

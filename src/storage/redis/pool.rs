//! Redis connection management and transaction execution

use crate::config::RedisConfig;
use crate::storage::KeyValueStore;
use crate::storage::transaction::{Reply, ReplyKind, StoreOp, Transaction};
use crate::utils::error::{GatewayError, Result};
use crate::utils::logging::sanitize_url;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, FromRedisValue, Pipeline, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Conditional sorted-set insert run server-side so the count check and the
/// write cannot interleave with other clients.
///
/// KEYS[1] = set, ARGV = score, member, limit, ttl seconds. Returns the
/// cardinality before the insert.
pub(crate) const ZADD_IF_BELOW_SCRIPT: &str = r#"
local count = redis.call('ZCARD', KEYS[1])
if count < tonumber(ARGV[3]) then
  redis.call('ZADD', KEYS[1], ARGV[1], ARGV[2])
  redis.call('EXPIRE', KEYS[1], ARGV[4])
end
return count
"#;

/// Redis-backed store.
///
/// Starts disconnected when the server cannot be reached; every operation of
/// a disconnected store fails.
#[derive(Clone)]
pub struct RedisStore {
    /// Connection manager (None when disconnected)
    pub(crate) manager: Option<ConnectionManager>,
    /// URL with the password masked
    pub(crate) display_url: String,
    /// Per-operation timeout
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("url", &self.display_url)
            .field("connected", &self.is_connected())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RedisStore {
    /// Connect to Redis
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let display_url = sanitize_url(&config.url);
        let timeout = Duration::from_secs(config.connection_timeout.max(1));
        info!("Connecting to Redis at {}", display_url);

        let client = Client::open(config.url.as_str()).map_err(|e| {
            GatewayError::Config(format!("Invalid Redis URL {}: {}", display_url, e))
        })?;

        let manager = match tokio::time::timeout(timeout, ConnectionManager::new(client)).await {
            Ok(Ok(manager)) => {
                info!("Redis connection established");
                Some(manager)
            }
            Ok(Err(e)) => {
                warn!("Redis unreachable at {}: {}. Store operations will fail", display_url, e);
                None
            }
            Err(_) => {
                warn!(
                    "Redis connection to {} timed out after {:?}. Store operations will fail",
                    display_url, timeout
                );
                None
            }
        };

        Ok(Self {
            manager,
            display_url,
            timeout,
        })
    }

    /// A store that never connected
    pub fn disconnected(display_url: impl Into<String>) -> Self {
        Self {
            manager: None,
            display_url: display_url.into(),
            timeout: Duration::from_secs(1),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_some()
    }

    fn connection(&self) -> Result<ConnectionManager> {
        self.manager
            .clone()
            .ok_or_else(|| GatewayError::storage("Redis is not connected"))
    }

    /// Build a MULTI/EXEC pipeline for `tx`
    pub(crate) fn pipeline(tx: &Transaction) -> Pipeline {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in tx.ops() {
            match op {
                StoreOp::ZAdd { key, score, member } => {
                    pipe.zadd(key, member, *score);
                }
                StoreOp::ZAddIfBelow {
                    key,
                    score,
                    member,
                    limit,
                    seconds,
                } => {
                    pipe.cmd("EVAL")
                        .arg(ZADD_IF_BELOW_SCRIPT)
                        .arg(1)
                        .arg(key)
                        .arg(score_arg(*score))
                        .arg(member)
                        .arg(*limit)
                        .arg(*seconds);
                }
                StoreOp::ZRem { key, member } => {
                    pipe.zrem(key, member);
                }
                StoreOp::ZRemRangeByScore { key, min, max } => {
                    pipe.cmd("ZREMRANGEBYSCORE")
                        .arg(key)
                        .arg(score_arg(*min))
                        .arg(score_arg(*max));
                }
                StoreOp::ZCard { key } => {
                    pipe.zcard(key);
                }
                StoreOp::ZRangeWithScores { key, start, stop } => {
                    pipe.zrange_withscores(key, *start, *stop);
                }
                StoreOp::Expire { key, seconds } => {
                    pipe.expire(key, *seconds);
                }
                StoreOp::ExpireAt { key, timestamp } => {
                    pipe.expire_at(key, *timestamp);
                }
                StoreOp::Set { key, value } => {
                    pipe.set(key, value);
                }
                StoreOp::Exists { key } => {
                    pipe.exists(key);
                }
            }
        }
        pipe
    }

    /// Convert raw EXEC replies into typed replies
    pub(crate) fn parse_replies(tx: &Transaction, values: Vec<Value>) -> Result<Vec<Reply>> {
        if values.len() != tx.len() {
            return Err(GatewayError::storage(format!(
                "malformed transaction result: {} ops, {} replies",
                tx.len(),
                values.len()
            )));
        }

        tx.ops()
            .iter()
            .zip(values)
            .map(|(op, value)| parse_reply(op.reply_kind(), value))
            .collect()
    }
}

fn parse_reply(kind: ReplyKind, value: Value) -> Result<Reply> {
    let reply = match kind {
        ReplyKind::Int => Reply::Int(i64::from_redis_value(&value).map_err(malformed)?),
        ReplyKind::Bool => Reply::Bool(bool::from_redis_value(&value).map_err(malformed)?),
        ReplyKind::Members => {
            Reply::Members(Vec::<(String, f64)>::from_redis_value(&value).map_err(malformed)?)
        }
        ReplyKind::Ok => match value {
            Value::Okay => Reply::Ok,
            Value::SimpleString(ref s) if s == "OK" => Reply::Ok,
            other => {
                return Err(GatewayError::storage(format!(
                    "malformed transaction result: expected OK, got {:?}",
                    other
                )));
            }
        },
    };
    Ok(reply)
}

fn malformed(e: redis::RedisError) -> GatewayError {
    GatewayError::storage(format!("malformed transaction result: {}", e))
}

fn score_arg(score: f64) -> String {
    if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if score == f64::INFINITY {
        "+inf".to_string()
    } else {
        score.to_string()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn exec(&self, tx: Transaction) -> Result<Vec<Reply>> {
        if tx.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connection()?;
        let pipe = Self::pipeline(&tx);

        let values: Vec<Value> = tokio::time::timeout(self.timeout, pipe.query_async(&mut conn))
            .await
            .map_err(|_| GatewayError::storage("Redis operation timed out"))?
            .map_err(GatewayError::Redis)?;

        Self::parse_replies(&tx, values)
    }

    async fn ping(&self) -> Result<()> {
        debug!("Performing Redis health check");
        let mut conn = self.connection()?;
        let _: String = tokio::time::timeout(self.timeout, redis::cmd("PING").query_async(&mut conn))
            .await
            .map_err(|_| GatewayError::storage("Redis ping timed out"))?
            .map_err(GatewayError::Redis)?;

        debug!("Redis health check passed");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        info!("Closing Redis connection to {}", self.display_url);
        // Connections are released when the last manager clone drops
        Ok(())
    }
}

//! Core rate limiter implementation

use super::types::RateLimitDecision;
use crate::config::models::rate_limit::RateLimitConfig;
use crate::storage::{SharedStore, Transaction};
use crate::utils::error::{GatewayError, Result};
use crate::utils::time::SharedClock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Sliding-window rate limiter.
///
/// Each `(client, route)` pair owns a sorted set of admitted request times.
/// Pruning, counting and the conditional insert run as one atomic
/// transaction. Store failures admit the request.
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    store: SharedStore,
    clock: SharedClock,
    config: RateLimitConfig,
}

impl SlidingWindowLimiter {
    /// Create a new rate limiter
    pub fn new(store: SharedStore, clock: SharedClock, config: RateLimitConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Store key of the window for `client` on `route`
    pub fn window_key(&self, client: &str, route: &str) -> String {
        format!("{}:{}:{}", self.config.key_prefix, client, route)
    }

    /// Admit or reject one request, recording it when admitted.
    ///
    /// Never fails: a store error yields a fail-open admission.
    pub async fn check_and_record(
        &self,
        client: &str,
        route: &str,
        method: &str,
    ) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision::fail_open(self.config.max_requests, self.config.window_secs);
        }

        match self.try_check_and_record(client, route, method).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    client = %client,
                    route = %route,
                    "Rate limiter store error, admitting request: {}",
                    e
                );
                RateLimitDecision::fail_open(self.config.max_requests, self.config.window_secs)
            }
        }
    }

    /// Same as [`check_and_record`](Self::check_and_record) but surfaces store errors
    pub async fn try_check_and_record(
        &self,
        client: &str,
        route: &str,
        method: &str,
    ) -> Result<RateLimitDecision> {
        let key = self.window_key(client, route);
        let window = self.config.window_secs as i64;
        let max = self.config.max_requests;
        let now = self.clock.now_unix();
        let window_start = now - window;

        // Prune, then record only if a slot is free, in one atomic unit. A
        // rejected attempt writes nothing and leaves the key TTL alone.
        let member = format!("{}:{}:{}:{}", now, method, route, Uuid::new_v4().simple());
        let tx = Transaction::new()
            .zrembyscore(&key, f64::NEG_INFINITY, window_start as f64)
            .zadd_if_below(&key, now as f64, member.as_str(), max, window)
            .zrange_withscores(&key, 0, 0);
        let replies = self.store.exec(tx.clone()).await?;
        tx.check_replies(&replies)?;
        let mut replies = replies.into_iter().skip(1);
        let count = replies
            .next()
            .ok_or_else(|| GatewayError::storage("malformed transaction result: missing count"))?
            .into_int()?;
        let count = u64::try_from(count).unwrap_or_default();

        if count >= max {
            let oldest = replies
                .next()
                .ok_or_else(|| GatewayError::storage("malformed transaction result: missing range"))?
                .into_members()?;

            let reset_secs = match oldest.first() {
                Some((_, score)) => (window as f64 - (now as f64 - score)).ceil().max(0.0) as u64,
                None => self.config.window_secs,
            };
            debug!(key = %key, count, reset_secs, "Rate limit exceeded");
            return Ok(RateLimitDecision::rejected(max, reset_secs));
        }

        let remaining = max - count - 1;
        debug!(key = %key, remaining, "Request admitted");
        Ok(RateLimitDecision::allowed(
            max,
            remaining,
            self.config.window_secs,
        ))
    }
}

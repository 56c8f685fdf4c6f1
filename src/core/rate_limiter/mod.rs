//! Rate Limiting Implementation
//!
//! Sliding-window limiting per `(client, route)` pair, backed by a sorted set
//! per pair in the shared key-value store.

mod limiter;
mod types;


// Re-export public types
pub use limiter::SlidingWindowLimiter;
pub use types::RateLimitDecision;

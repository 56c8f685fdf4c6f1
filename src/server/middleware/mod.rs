//! HTTP middleware implementations
//!
//! - Sliding-window rate limiting, applied to every request
//! - Authentication guards for protected scopes

mod auth;
mod helpers;
mod rate_limit;


pub use auth::{AuthGuard, AuthGuardService, current_principal};
pub use helpers::{UNKNOWN_CLIENT, bearer_token, client_identifier, extract_token, request_client_id};
pub use rate_limit::{
    RateLimitMiddleware, RateLimitMiddlewareService, RateLimitedBody, X_RATELIMIT_LIMIT,
    X_RATELIMIT_REMAINING, X_RATELIMIT_RESET, apply_rate_limit_headers,
};

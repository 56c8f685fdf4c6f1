//! Core functionality for the Gateway
//!
//! This module contains the request-admission logic that does not depend on
//! the HTTP layer.

pub mod rate_limiter;

//! Redis storage implementation
//!
//! - `pool` - connection management and MULTI/EXEC transaction execution
//! - `tests` - module tests

mod pool;

pub use pool::RedisStore;

//! Common test utilities for bellespot-gateway
//!
//! - Gateway fixtures wired on a [`MemoryStore`](bellespot_gateway::MemoryStore)
//!   and a manual clock
//! - User factories
//! - Misbehaving stores
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{TestGateway, UserFactory};
//!
//! #[actix_web::test]
//! async fn my_test() {
//!     let gateway = TestGateway::new();
//!     let (user, token) = gateway.signed_in(UserFactory::user()).await;
//!     // ...
//! }
//! ```

pub mod stores;

// Re-export commonly used items
pub use fixtures::{TestGateway, UserFactory};
pub use stores::{FailingStore, MalformedStore, ReadOnlyStore};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

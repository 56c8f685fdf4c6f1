//! JWT (JSON Web Token) handling
//!
//! - `types` - handler and claims types
//! - `handler` - token issuing, verification and unverified decoding
//! - `tests` - module tests

mod handler;
mod types;


pub use types::{Claims, JwtHandler};

//! Authentication
//!
//! Session tokens, the revoked-token blocklist, the composed request guard
//! and the account helpers the auth endpoints need.

pub mod guard;
pub mod jwt;
pub mod password;
pub mod revocation;
pub mod users;
pub mod validation;

pub use guard::{AuthRejection, Authenticator, GuardKind};
pub use jwt::{Claims, JwtHandler};
pub use revocation::TokenRevocation;
pub use users::{
    InMemoryUserDirectory, NewUser, Principal, Role, SharedUserDirectory, UserDirectory,
    UserRecord,
};

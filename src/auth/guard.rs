//! Composed authentication guard
//!
//! Token present, signature and expiry valid, not revoked, account found and,
//! for the role variants, the expected role. Every failure becomes an
//! [`AuthRejection`]; a revocation check that cannot be performed rejects.

use super::jwt::JwtHandler;
use super::revocation::TokenRevocation;
use super::users::{Principal, Role, SharedUserDirectory};
use crate::utils::error::ErrorResponse;
use crate::utils::logging::token_fingerprint;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

pub const MSG_TOKEN_MISSING: &str = "Token is not Present";
pub const MSG_INVALID_TOKEN: &str = "Invalid token";
pub const MSG_USER_MISSING: &str = "User Doesn't Exist";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid Credentials";
pub const MSG_AUTH_FAILED: &str = "Authentication failed";

/// Guard variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Any authenticated account
    User,
    /// Service provider accounts only
    ServiceProvider,
    /// Administrators only
    Admin,
}

impl GuardKind {
    /// Role the token must carry, if any
    pub fn required_role(&self) -> Option<Role> {
        match self {
            GuardKind::User => None,
            GuardKind::ServiceProvider => Some(Role::ServiceProvider),
            GuardKind::Admin => Some(Role::Admin),
        }
    }

    fn role_denied(&self) -> &'static str {
        match self {
            GuardKind::ServiceProvider => "Access restricted to serviceProvider",
            _ => "Access restricted to administrators",
        }
    }

    fn user_missing(&self) -> &'static str {
        match self {
            GuardKind::User => MSG_USER_MISSING,
            _ => MSG_INVALID_CREDENTIALS,
        }
    }
}

/// Why a request was turned away
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRejection {
    pub status: StatusCode,
    pub kind: GuardKind,
    pub reason: String,
}

impl AuthRejection {
    fn unauthorized(kind: GuardKind, reason: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            kind,
            reason: reason.to_string(),
        }
    }

    fn forbidden(kind: GuardKind, reason: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            kind,
            reason: reason.to_string(),
        }
    }

    /// JSON body. The user guard reports the reason as `message`; the role
    /// guards use a fixed message and carry the reason in `error`.
    pub fn body(&self) -> ErrorResponse {
        match self.kind {
            GuardKind::User => ErrorResponse {
                success: false,
                message: self.reason.clone(),
                error: None,
            },
            GuardKind::ServiceProvider | GuardKind::Admin => ErrorResponse {
                success: false,
                message: MSG_AUTH_FAILED.to_string(),
                error: Some(self.reason.clone()),
            },
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(self.body())
    }
}

/// Token checks shared by every guard variant
#[derive(Debug, Clone)]
pub struct Authenticator {
    jwt: Arc<JwtHandler>,
    revocation: TokenRevocation,
    users: SharedUserDirectory,
}

impl Authenticator {
    pub fn new(
        jwt: Arc<JwtHandler>,
        revocation: TokenRevocation,
        users: SharedUserDirectory,
    ) -> Self {
        Self {
            jwt,
            revocation,
            users,
        }
    }

    /// Run the guard for `kind` against the presented token
    pub async fn authenticate(
        &self,
        token: Option<&str>,
        kind: GuardKind,
    ) -> std::result::Result<Principal, AuthRejection> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthRejection::unauthorized(kind, MSG_TOKEN_MISSING)),
        };

        let claims = self.jwt.verify_token(token).map_err(|e| {
            debug!(token = %token_fingerprint(token), "Token rejected: {}", e);
            AuthRejection::unauthorized(kind, MSG_INVALID_TOKEN)
        })?;

        let Some(user_id) = claims.id.as_deref() else {
            return Err(AuthRejection::unauthorized(kind, MSG_INVALID_TOKEN));
        };
        if kind.required_role().is_some() && claims.role.is_none() {
            return Err(AuthRejection::unauthorized(kind, MSG_INVALID_TOKEN));
        }

        match self.revocation.is_revoked(token).await {
            Ok(false) => {}
            Ok(true) => {
                debug!(token = %token_fingerprint(token), "Revoked token presented");
                return Err(AuthRejection::unauthorized(kind, MSG_INVALID_TOKEN));
            }
            Err(e) => {
                warn!(
                    token = %token_fingerprint(token),
                    "Revocation check failed, rejecting request: {}",
                    e
                );
                return Err(AuthRejection::unauthorized(kind, MSG_INVALID_TOKEN));
            }
        }

        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(user_id, "Token subject not found");
                return Err(AuthRejection::unauthorized(kind, kind.user_missing()));
            }
            Err(e) => {
                warn!(user_id, "User lookup failed, rejecting request: {}", e);
                return Err(AuthRejection::unauthorized(kind, kind.user_missing()));
            }
        };

        if let Some(required) = kind.required_role() {
            if claims.role != Some(required) {
                debug!(user_id, "Role {:?} denied, {} required", claims.role, required);
                return Err(AuthRejection::forbidden(kind, kind.role_denied()));
            }
        }

        Ok(user.principal())
    }
}

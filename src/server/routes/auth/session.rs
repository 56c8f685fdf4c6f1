//! Session endpoints

use super::cookies::clear_session_cookie;
use super::models::{CheckResponse, MessageResponse};
use crate::server::middleware::{current_principal, extract_token};
use crate::server::routes::failure;
use crate::server::state::AppState;
use crate::utils::logging::token_fingerprint;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{error, info};

/// Logout endpoint
///
/// Blocks the presented token until its own `exp` and clears the cookie.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let auth = &state.config.gateway.auth;

    let Some(token) = extract_token(req.cookie(&auth.cookie_name), req.headers()) else {
        return failure(StatusCode::BAD_REQUEST, "No token found");
    };

    // Decoding only reads `exp`; the guard already verified the token
    let claims = match state.jwt.decode_unverified(&token) {
        Ok(claims) => claims,
        Err(_) => return failure(StatusCode::BAD_REQUEST, "Invalid token"),
    };

    if let Err(e) = state.revocation.revoke(&token, claims.exp).await {
        error!(token = %token_fingerprint(&token), "Failed to revoke token: {}", e);
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Logout failed: {}", e.public_message()),
        );
    }

    info!(token = %token_fingerprint(&token), "User logged out");
    HttpResponse::Ok()
        .cookie(clear_session_cookie(auth))
        .json(MessageResponse::ok("Logged out successfully"))
}

/// Session check endpoint
pub async fn check_auth(req: HttpRequest) -> ActixResult<HttpResponse> {
    let principal = current_principal(&req)?;
    Ok(HttpResponse::Ok().json(CheckResponse {
        success: true,
        user: principal.into(),
    }))
}

//! User login endpoint

use super::cookies::session_cookie;
use super::models::{LoginRequest, LoginResponse};
use crate::auth::password::verify_password_async;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpResponse, web};
use tracing::{info, warn};

/// User login endpoint
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    let (Some(email_id), Some(password)) = (
        request.email_id.filter(|s| !s.trim().is_empty()),
        request.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(GatewayError::bad_request("Email and password are required"));
    };

    let Some(user) = state.users.find_by_email(&email_id).await? else {
        warn!("Login attempt for unknown account");
        return Err(GatewayError::auth("Invalid credentials"));
    };

    if !verify_password_async(password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "Login attempt with invalid password");
        return Err(GatewayError::auth("Invalid credentials"));
    }

    let token = state.jwt.create_token(&user)?;
    info!(user_id = %user.id, "User logged in");

    let auth = &state.config.gateway.auth;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(auth, token, state.jwt.expiration()))
        .json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: user.principal().into(),
        }))
}

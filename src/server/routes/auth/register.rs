//! Account registration endpoints

use super::cookies::session_cookie;
use super::models::{RegisterRequest, RegisterResponse};
use crate::auth::password::hash_password_async;
use crate::auth::validation::validate_registration;
use crate::auth::{NewUser, Role};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpResponse, web};
use tracing::{info, warn};

/// Customer registration endpoint
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    register_account(&state, request.into_inner(), Role::User, "Registration successful").await
}

/// Service provider registration endpoint
pub async fn service_register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    register_account(
        &state,
        request.into_inner(),
        Role::ServiceProvider,
        "Service provider registration successful",
    )
    .await
}

/// Administrator registration endpoint. Only the first admin can register.
pub async fn admin_register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    if state.users.admin_exists().await? {
        warn!("Admin registration refused, an admin already exists");
        return Err(GatewayError::forbidden("Admin already exists"));
    }

    register_account(
        &state,
        request.into_inner(),
        Role::Admin,
        "Admin registration successful",
    )
    .await
}

async fn register_account(
    state: &AppState,
    request: RegisterRequest,
    role: Role,
    message: &str,
) -> Result<HttpResponse> {
    validate_registration(
        request.first_name.as_deref(),
        request.email_id.as_deref(),
        request.password.as_deref(),
    )?;

    let first_name = request.first_name.unwrap_or_default();
    let email_id = request.email_id.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    if state.users.find_by_email(&email_id).await?.is_some() {
        return Err(GatewayError::bad_request("Email already registered"));
    }

    let password_hash = hash_password_async(password).await?;

    let user = state
        .users
        .create(NewUser {
            first_name,
            email_id,
            password_hash,
            role,
        })
        .await
        .map_err(|e| match e {
            GatewayError::Conflict(msg) => GatewayError::BadRequest(msg),
            other => other,
        })?;

    let token = state.jwt.create_token(&user)?;
    info!(user_id = %user.id, role = %user.role, "Account registered");

    let auth = &state.config.gateway.auth;
    Ok(HttpResponse::Created()
        .cookie(session_cookie(auth, token, state.jwt.expiration()))
        .json(RegisterResponse {
            success: true,
            message: message.to_string(),
            user: (&user).into(),
        }))
}

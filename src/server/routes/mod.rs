//! HTTP route modules

pub mod auth;
pub mod health;

use crate::utils::error::{ErrorResponse, GatewayError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

/// Configure every route of the gateway
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes);
}

/// Failure body with the message repeated in `error`
pub fn failure(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    let message = message.into();
    HttpResponse::build(status).json(ErrorResponse {
        success: false,
        error: Some(message.clone()),
        message,
    })
}

/// JSON extractor config answering malformed bodies with the standard error body
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| GatewayError::bad_request(err.to_string()).into())
}

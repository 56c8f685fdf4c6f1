//! Authentication endpoints

mod cookies;
mod login;
mod models;
mod register;
mod session;

pub use cookies::{clear_session_cookie, session_cookie};
pub use login::login;
pub use models::{
    CheckResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, RegisteredUser, SessionUser,
};
pub use register::{admin_register, register, service_register};
pub use session::{check_auth, logout};

use crate::server::middleware::AuthGuard;
use crate::server::routes::json_config;
use actix_web::web;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .app_data(json_config())
            .route("/register", web::post().to(register))
            .route("/service/register", web::post().to(service_register))
            .route("/admin/register", web::post().to(admin_register))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/logout")
                    .wrap(AuthGuard::user())
                    .route(web::post().to(logout)),
            )
            .service(
                web::resource("/check")
                    .wrap(AuthGuard::user())
                    .route(web::get().to(check_auth)),
            ),
    );
}

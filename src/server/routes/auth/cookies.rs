//! Session cookie

use crate::config::AuthConfig;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};

/// Cookie carrying `token`, living as long as the token itself
pub fn session_cookie(config: &AuthConfig, token: String, max_age_secs: u64) -> Cookie<'static> {
    let mut builder = Cookie::build(config.cookie_name.clone(), token)
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::seconds(max_age_secs as i64));

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.finish()
}

/// Removal cookie with the same attributes as the session cookie
pub fn clear_session_cookie(config: &AuthConfig) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new(), 0);
    cookie.make_removal();
    cookie
}

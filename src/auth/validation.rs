//! Registration input validation

use crate::utils::error::{GatewayError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex")
});

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check an e-mail address shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// At least eight characters with a lowercase letter, an uppercase letter,
/// a digit and a symbol
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// Validate registration fields. Missing fields are reported before shape errors.
pub fn validate_registration(
    first_name: Option<&str>,
    email_id: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let (Some(first_name), Some(email_id), Some(password)) = (
        first_name.map(str::trim).filter(|s| !s.is_empty()),
        email_id.map(str::trim).filter(|s| !s.is_empty()),
        password.filter(|s| !s.is_empty()),
    ) else {
        return Err(GatewayError::validation("Some Field Missing"));
    };

    let name_len = first_name.chars().count();
    if !(3..=20).contains(&name_len) {
        return Err(GatewayError::validation(
            "First name must be between 3 and 20 characters",
        ));
    }

    if !is_valid_email(email_id) {
        return Err(GatewayError::validation("Invalid Email"));
    }

    if !is_strong_password(password) {
        return Err(GatewayError::validation("Weak Password"));
    }

    Ok(())
}

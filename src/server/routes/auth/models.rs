//! Request and response models for authentication endpoints

use crate::auth::{Principal, Role, UserRecord};
use serde::{Deserialize, Serialize};

/// Registration request. Fields are optional so that missing ones are
/// reported by validation rather than by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub email_id: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_id: Option<String>,
    pub password: Option<String>,
}

/// Account summary returned on registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub first_name: String,
    pub email_id: String,
    pub role: Role,
}

impl From<&UserRecord> for RegisteredUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            first_name: user.first_name.clone(),
            email_id: user.email_id.clone(),
            role: user.role,
        }
    }
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: RegisteredUser,
}

/// Session view of the signed-in account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub first_name: String,
    pub role: Role,
    #[serde(rename = "cart_length")]
    pub cart_length: usize,
    pub profile_photo: Option<String>,
}

impl From<Principal> for SessionUser {
    fn from(principal: Principal) -> Self {
        Self {
            first_name: principal.first_name,
            role: principal.role,
            cart_length: principal.cart_length,
            profile_photo: principal.profile_photo,
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
}

/// Session check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub success: bool,
    pub user: SessionUser,
}

/// Plain success message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

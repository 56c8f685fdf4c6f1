//! User lookup
//!
//! Accounts live in the document store; the gateway only needs lookup by id
//! and e-mail, account creation and the "is there an admin yet" check. The
//! in-memory directory backs development runs and tests.

use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Account role, serialized as it appears in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "serviceProvider")]
    ServiceProvider,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::ServiceProvider => "serviceProvider",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shop's services in a user's cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub shop_name: String,
    /// Service ids
    pub services: Vec<String>,
}

/// Stored account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub email_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub cart: Vec<CartEntry>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Number of services across all cart entries
    pub fn cart_length(&self) -> usize {
        self.cart.iter().map(|entry| entry.services.len()).sum()
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            email_id: self.email_id.clone(),
            role: self.role,
            profile_photo: self.profile_photo.clone(),
            cart_length: self.cart_length(),
        }
    }
}

/// Authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub email_id: String,
    pub role: Role,
    pub profile_photo: Option<String>,
    #[serde(rename = "cart_length")]
    pub cart_length: usize,
}

/// Fields of an account to create
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub email_id: String,
    pub password_hash: String,
    pub role: Role,
}

/// Account lookup contract
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>>;

    async fn find_by_email(&self, email_id: &str) -> Result<Option<UserRecord>>;

    /// Create an account. Fails with `Conflict` when the e-mail is taken.
    async fn create(&self, user: NewUser) -> Result<UserRecord>;

    async fn admin_exists(&self) -> Result<bool>;
}

/// Shared directory handle
pub type SharedUserDirectory = Arc<dyn UserDirectory>;

/// E-mail addresses are stored trimmed and lowercase
pub fn normalize_email(email_id: &str) -> String {
    email_id.trim().to_lowercase()
}

/// In-memory user directory
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<String, UserRecord>,
    /// email -> id
    emails: DashMap<String, String>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Remove an account
    pub fn remove(&self, id: &str) -> Option<UserRecord> {
        let (_, user) = self.users.remove(id)?;
        self.emails.remove(&user.email_id);
        Some(user)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email_id: &str) -> Result<Option<UserRecord>> {
        let email_id = normalize_email(email_id);
        let Some(id) = self.emails.get(&email_id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let email_id = normalize_email(&user.email_id);
        let id = Uuid::new_v4().simple().to_string();

        // The e-mail slot is claimed first so concurrent registrations of the
        // same address cannot both succeed
        match self.emails.entry(email_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(GatewayError::conflict("Email already registered"));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let record = UserRecord {
            id: id.clone(),
            first_name: user.first_name.trim().to_string(),
            email_id,
            password_hash: user.password_hash,
            role: user.role,
            profile_photo: None,
            cart: Vec::new(),
            created_at: Utc::now(),
        };
        self.users.insert(id, record.clone());

        debug!("Created {} account {}", record.role, record.id);
        Ok(record)
    }

    async fn admin_exists(&self) -> Result<bool> {
        Ok(self.users.iter().any(|entry| entry.role == Role::Admin))
    }
}

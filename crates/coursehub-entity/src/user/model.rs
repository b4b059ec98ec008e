//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login name, unique.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Argon2id password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role in the system.
    pub role: UserRole,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last account update.
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Role in the system.
    pub role: UserRole,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

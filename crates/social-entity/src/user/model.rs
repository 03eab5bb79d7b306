//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::password::PasswordHash;
use super::role::Role;

/// A registered principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash. Never serialized.
    #[serde(skip)]
    pub password: PasswordHash,
    /// Whether the account has been activated through its invitation.
    pub is_active: bool,
    /// Foreign key into the role catalog.
    pub role_id: i64,
    /// The joined role row.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to register a new, inactive principal.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password: PasswordHash,
    /// Name of the role to assign.
    pub role: String,
}

//! Role catalog entry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the default role assigned at registration.
pub const USER: &str = "user";
/// Name of the role allowed to edit other users' posts.
pub const MODERATOR: &str = "moderator";
/// Name of the role allowed to delete other users' content.
pub const ADMIN: &str = "admin";

/// A named authorization tier.
///
/// Precedence is decided by `level` (higher = more privileged), never by
/// comparing names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Role identifier.
    pub id: i64,
    /// Unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Privilege level.
    pub level: i32,
}

impl Role {
    /// Whether this role is at least as privileged as `required_level`.
    pub fn meets(&self, required_level: i32) -> bool {
        self.level >= required_level
    }
}

//! Activation invitation row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Links the lookup hash of a raw activation token to a pending principal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Hex SHA-256 of the raw token.
    pub token: String,
    /// The principal awaiting activation.
    pub user_id: i64,
    /// Instant after which the invitation can no longer be consumed.
    pub expiry: DateTime<Utc>,
}

impl Invitation {
    /// Whether the invitation is still consumable at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }
}

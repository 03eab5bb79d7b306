//! Follow relationship row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `follower_id` follows `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follower {
    /// The followed user.
    pub user_id: i64,
    /// The following user.
    pub follower_id: i64,
    /// When the relationship was created.
    pub created_at: DateTime<Utc>,
}

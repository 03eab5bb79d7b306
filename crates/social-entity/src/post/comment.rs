//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment on a post, with its author's username joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: i64,
    /// The commented post.
    pub post_id: i64,
    /// Author.
    pub user_id: i64,
    /// Comment body.
    pub content: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// Author's username.
    pub username: String,
}

/// Data required to create a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// The commented post.
    pub post_id: i64,
    /// Author.
    pub user_id: i64,
    /// Comment body.
    pub content: String,
}

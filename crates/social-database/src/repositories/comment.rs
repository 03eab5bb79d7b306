//! Comment repository.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use social_core::error::AppError;
use social_core::result::AppResult;
use social_entity::{Comment, NewComment};

use super::{bounded, db_error};
use crate::store::CommentStore;

/// Repository for post comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
    timeout: Duration,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn create(&self, comment: &NewComment) -> AppResult<Comment> {
        bounded(self.timeout, "create comment", async {
            sqlx::query_as::<_, Comment>(
                "WITH inserted AS ( \
                     INSERT INTO comments (post_id, user_id, content) VALUES ($1, $2, $3) \
                     RETURNING id, post_id, user_id, content, created_at) \
                 SELECT i.id, i.post_id, i.user_id, i.content, i.created_at, u.username \
                 FROM inserted i JOIN users u ON u.id = i.user_id",
            )
            .bind(comment.post_id)
            .bind(comment.user_id)
            .bind(&comment.content)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::not_found(format!("Post {} not found", comment.post_id))
                }
                _ => db_error("Failed to create comment")(e),
            })
        })
        .await
    }

    async fn list_by_post(&self, post_id: i64) -> AppResult<Vec<Comment>> {
        bounded(self.timeout, "list comments", async {
            sqlx::query_as::<_, Comment>(
                "SELECT c.id, c.post_id, c.user_id, c.content, c.created_at, u.username \
                 FROM comments c JOIN users u ON u.id = c.user_id \
                 WHERE c.post_id = $1 \
                 ORDER BY c.created_at DESC, c.id DESC",
            )
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list comments"))
        })
        .await
    }
}

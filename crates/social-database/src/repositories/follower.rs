//! Follower repository.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use social_core::error::{AppError, ConflictReason};
use social_core::result::AppResult;

use super::{bounded, db_error};
use crate::store::FollowerStore;

/// Repository for follow relationships.
#[derive(Debug, Clone)]
pub struct FollowerRepository {
    pool: PgPool,
    timeout: Duration,
}

impl FollowerRepository {
    /// Create a new follower repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl FollowerStore for FollowerRepository {
    async fn follow(&self, follower_id: i64, user_id: i64) -> AppResult<()> {
        bounded(self.timeout, "follow user", async {
            sqlx::query("INSERT INTO followers (user_id, follower_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(follower_id)
                .execute(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                        AppError::conflict_with(ConflictReason::DuplicateFollow)
                    }
                    sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                        AppError::not_found(format!("User {user_id} not found"))
                    }
                    _ => db_error("Failed to follow user")(e),
                })?;
            Ok(())
        })
        .await
    }

    async fn unfollow(&self, follower_id: i64, user_id: i64) -> AppResult<()> {
        bounded(self.timeout, "unfollow user", async {
            sqlx::query("DELETE FROM followers WHERE user_id = $1 AND follower_id = $2")
                .bind(user_id)
                .bind(follower_id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to unfollow user"))?;
            Ok(())
        })
        .await
    }
}

//! Post repository with compare-and-increment updates.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use social_core::error::{AppError, ConflictReason};
use social_core::result::AppResult;
use social_core::types::FeedQuery;
use social_entity::{FeedItem, NewPost, Post, PostChanges};

use super::{bounded, db_error};
use crate::store::PostStore;

const POST_COLUMNS: &str = "id, title, content, user_id, tags, version, created_at, updated_at";

/// Repository for posts and the user feed.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, post: &NewPost) -> AppResult<Post> {
        bounded(self.timeout, "create post", async {
            sqlx::query_as::<_, Post>(&format!(
                "INSERT INTO posts (title, content, user_id, tags) \
                 VALUES ($1, $2, $3, $4) RETURNING {POST_COLUMNS}"
            ))
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.user_id)
            .bind(&post.tags)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create post"))
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>> {
        bounded(self.timeout, "find post by id", async {
            sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find post by id"))
        })
        .await
    }

    async fn update(
        &self,
        id: i64,
        expected_version: i32,
        changes: &PostChanges,
    ) -> AppResult<Post> {
        bounded(self.timeout, "update post", async {
            sqlx::query_as::<_, Post>(&format!(
                "UPDATE posts SET title = COALESCE($1, title), \
                                  content = COALESCE($2, content), \
                                  tags = COALESCE($3, tags), \
                                  updated_at = NOW(), \
                                  version = version + 1 \
                 WHERE id = $4 AND version = $5 \
                 RETURNING {POST_COLUMNS}"
            ))
            .bind(&changes.title)
            .bind(&changes.content)
            .bind(&changes.tags)
            .bind(id)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update post"))?
            .ok_or_else(|| AppError::conflict_with(ConflictReason::VersionMismatch))
        })
        .await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        bounded(self.timeout, "delete post", async {
            let result = sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to delete post"))?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("Post {id} not found")));
            }
            Ok(())
        })
        .await
    }

    async fn feed(&self, user_id: i64, query: &FeedQuery) -> AppResult<Vec<FeedItem>> {
        let direction = query.sort.as_sql();
        bounded(self.timeout, "load feed", async {
            sqlx::query_as::<_, FeedItem>(&format!(
                "SELECT p.id, p.title, p.content, p.user_id, p.tags, p.version, \
                        p.created_at, p.updated_at, \
                        u.username, COUNT(c.id) AS comments_count \
                 FROM posts p \
                 JOIN users u ON u.id = p.user_id \
                 LEFT JOIN comments c ON c.post_id = p.id \
                 WHERE p.user_id = $1 \
                    OR p.user_id IN (SELECT user_id FROM followers WHERE follower_id = $1) \
                 GROUP BY p.id, u.username \
                 ORDER BY p.created_at {direction}, p.id {direction} \
                 LIMIT $2 OFFSET $3"
            ))
            .bind(user_id)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load feed"))
        })
        .await
    }
}

//! Post lifecycle with optimistic concurrency on updates.

use std::sync::Arc;

use tracing::{info, warn};

use social_auth::RoleEnforcer;
use social_core::error::{AppError, ConflictReason};
use social_core::result::AppResult;
use social_database::{CommentStore, PostStore, Storage};
use social_entity::user::role;
use social_entity::{NewPost, Post, PostChanges, PostDetail};

use crate::context::RequestContext;

/// A partial post update.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    /// The fields to change.
    pub changes: PostChanges,
    /// Version the caller last saw. Defaults to the version loaded by this request.
    pub expected_version: Option<i32>,
}

/// Creates, reads, updates and deletes posts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    enforcer: RoleEnforcer,
}

impl std::fmt::Debug for PostService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostService").finish_non_exhaustive()
    }
}

impl PostService {
    /// Creates a new post service.
    pub fn new(storage: &Storage) -> Self {
        Self {
            posts: Arc::clone(&storage.posts),
            comments: Arc::clone(&storage.comments),
            enforcer: RoleEnforcer::new(Arc::clone(&storage.roles)),
        }
    }

    /// Publish a post owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> AppResult<Post> {
        let post = self
            .posts
            .create(&NewPost {
                title,
                content,
                user_id: ctx.user_id(),
                tags,
            })
            .await?;
        info!(post_id = post.id, user_id = ctx.user_id(), "Post created");
        Ok(post)
    }

    /// Load a post or fail with `NotFound`.
    pub async fn get(&self, post_id: i64) -> AppResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))
    }

    /// Load a post together with its comments.
    pub async fn get_with_comments(&self, post_id: i64) -> AppResult<PostDetail> {
        let post = self.get(post_id).await?;
        let comments = self.comments.list_by_post(post_id).await?;
        Ok(PostDetail { post, comments })
    }

    /// Apply a partial update. Owner or moderator only.
    ///
    /// The write succeeds only if the stored version still equals the
    /// expected one; otherwise the caller gets a `VersionMismatch` conflict
    /// and must re-read. There is no retry.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        post_id: i64,
        update: UpdatePost,
    ) -> AppResult<Post> {
        let current = self.get(post_id).await?;
        self.enforcer
            .authorize_owner_or_role(&ctx.user, current.user_id, role::MODERATOR)
            .await?;

        let expected = update.expected_version.unwrap_or(current.version);
        let post = self
            .posts
            .update(post_id, expected, &update.changes)
            .await
            .inspect_err(|e| {
                if e.is_conflict(ConflictReason::VersionMismatch) {
                    warn!(post_id, expected, "Concurrent post modification");
                }
            })?;

        info!(post_id, version = post.version, user_id = ctx.user_id(), "Post updated");
        Ok(post)
    }

    /// Delete a post. Owner or admin only.
    pub async fn delete(&self, ctx: &RequestContext, post_id: i64) -> AppResult<()> {
        let current = self.get(post_id).await?;
        self.enforcer
            .authorize_owner_or_role(&ctx.user, current.user_id, role::ADMIN)
            .await?;

        self.posts.delete(post_id).await?;
        info!(post_id, user_id = ctx.user_id(), "Post deleted");
        Ok(())
    }
}

//! Store contracts, one per entity.
//!
//! Every method is a complete unit of work: multi-statement operations
//! (registration, activation, deletion) apply in full or not at all.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use social_core::result::AppResult;
use social_core::types::FeedQuery;
use social_entity::{
    Comment, FeedItem, NewComment, NewPost, NewUser, Post, PostChanges, Role, User,
};

use crate::repositories::{
    CommentRepository, FollowerRepository, PostRepository, RoleRepository, UserRepository,
};

/// Principal and invitation persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a principal by id, regardless of activation state.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find an *active* principal by email. Inactive principals are not returned.
    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert an inactive principal and its invitation in one unit of work.
    ///
    /// Duplicate email or username fails with a conflict carrying
    /// `DuplicateEmail` or `DuplicateUsername`, and nothing is written.
    async fn create_with_invitation(
        &self,
        draft: &NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> AppResult<User>;

    /// Consume a live invitation and activate its principal in one unit of work.
    ///
    /// An absent or expired invitation fails with `NotFound`.
    async fn activate(&self, token_hash: &str) -> AppResult<()>;

    /// Delete a principal together with its invitation.
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Read-only role catalog.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Find a role by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;
}

/// Post persistence with optimistic concurrency.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Insert a post at version 0.
    async fn create(&self, post: &NewPost) -> AppResult<Post>;

    /// Find a post by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>>;

    /// Apply `changes` only if the stored version equals `expected_version`,
    /// bumping the version by one in the same write.
    ///
    /// Zero matching rows (missing post or stale version) fails with a
    /// `VersionMismatch` conflict. Never retries.
    async fn update(&self, id: i64, expected_version: i32, changes: &PostChanges)
    -> AppResult<Post>;

    /// Delete a post. Fails with `NotFound` when it does not exist.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Posts by `user_id` and by the users they follow.
    async fn feed(&self, user_id: i64, query: &FeedQuery) -> AppResult<Vec<FeedItem>>;
}

/// Comment persistence.
#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    /// Insert a comment. Fails with `NotFound` when the post does not exist.
    async fn create(&self, comment: &NewComment) -> AppResult<Comment>;

    /// Comments on a post, newest first.
    async fn list_by_post(&self, post_id: i64) -> AppResult<Vec<Comment>>;
}

/// Follow relationships.
#[async_trait]
pub trait FollowerStore: Send + Sync + 'static {
    /// `follower_id` starts following `user_id`.
    ///
    /// Fails with a `DuplicateFollow` conflict when already following and
    /// with `NotFound` when `user_id` does not exist.
    async fn follow(&self, follower_id: i64, user_id: i64) -> AppResult<()>;

    /// `follower_id` stops following `user_id`. Idempotent.
    async fn unfollow(&self, follower_id: i64, user_id: i64) -> AppResult<()>;
}

/// One bound implementation of every store contract.
#[derive(Clone)]
pub struct Storage {
    /// Principals and invitations.
    pub users: Arc<dyn UserStore>,
    /// Role catalog.
    pub roles: Arc<dyn RoleStore>,
    /// Posts.
    pub posts: Arc<dyn PostStore>,
    /// Comments.
    pub comments: Arc<dyn CommentStore>,
    /// Follow relationships.
    pub followers: Arc<dyn FollowerStore>,
}

impl Storage {
    /// Bind the PostgreSQL repositories, each call bounded by `query_timeout`.
    pub fn postgres(pool: sqlx::PgPool, query_timeout: Duration) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone(), query_timeout)),
            roles: Arc::new(RoleRepository::new(pool.clone(), query_timeout)),
            posts: Arc::new(PostRepository::new(pool.clone(), query_timeout)),
            comments: Arc::new(CommentRepository::new(pool.clone(), query_timeout)),
            followers: Arc::new(FollowerRepository::new(pool, query_timeout)),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

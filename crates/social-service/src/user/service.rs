//! Principal lookup, follow relationships, feed and account deletion.

use std::sync::Arc;

use tracing::info;

use social_auth::RoleEnforcer;
use social_cache::UserCache;
use social_core::error::AppError;
use social_core::result::AppResult;
use social_core::types::FeedQuery;
use social_database::{FollowerStore, PostStore, Storage, UserStore};
use social_entity::user::role;
use social_entity::{FeedItem, User};

use crate::context::RequestContext;

/// Principal-centric operations for authenticated callers.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    followers: Arc<dyn FollowerStore>,
    posts: Arc<dyn PostStore>,
    cache: UserCache,
    enforcer: RoleEnforcer,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(storage: &Storage, cache: UserCache) -> Self {
        Self {
            users: Arc::clone(&storage.users),
            followers: Arc::clone(&storage.followers),
            posts: Arc::clone(&storage.posts),
            cache,
            enforcer: RoleEnforcer::new(Arc::clone(&storage.roles)),
        }
    }

    /// Load a principal, consulting the cache first and filling it on a miss.
    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        if let Some(user) = self.cache.get(user_id).await {
            return Ok(user);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        self.cache.set(&user, self.cache.ttl()).await;
        Ok(user)
    }

    /// The caller starts following `target_id`.
    pub async fn follow(&self, ctx: &RequestContext, target_id: i64) -> AppResult<()> {
        if ctx.user_id() == target_id {
            return Err(AppError::validation("cannot follow yourself"));
        }
        self.followers.follow(ctx.user_id(), target_id).await?;
        info!(follower_id = ctx.user_id(), user_id = target_id, "User followed");
        Ok(())
    }

    /// The caller stops following `target_id`.
    pub async fn unfollow(&self, ctx: &RequestContext, target_id: i64) -> AppResult<()> {
        self.followers.unfollow(ctx.user_id(), target_id).await?;
        info!(follower_id = ctx.user_id(), user_id = target_id, "User unfollowed");
        Ok(())
    }

    /// Posts by the caller and everyone they follow.
    pub async fn feed(&self, ctx: &RequestContext, query: &FeedQuery) -> AppResult<Vec<FeedItem>> {
        query.validate()?;
        self.posts.feed(ctx.user_id(), query).await
    }

    /// Delete an account. Only the account owner or an admin may do so.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i64) -> AppResult<()> {
        self.enforcer
            .authorize_owner_or_role(&ctx.user, user_id, role::ADMIN)
            .await?;

        self.users.delete(user_id).await?;
        self.cache.invalidate(user_id).await;

        info!(user_id, deleted_by = ctx.user_id(), "User deleted");
        Ok(())
    }
}

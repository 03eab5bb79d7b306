//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use social_auth::{JwtDecoder, StaticCredentials};
use social_cache::UserCache;
use social_core::config::AppConfig;
use social_database::Storage;
use social_service::{AccountService, CommentService, Mailer, PostService, UserService};

use crate::middleware::rate_limit::FixedWindowRateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Session token validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Credentials guarding Basic-authenticated routes
    pub basic_credentials: Arc<StaticCredentials>,
    /// Per-client request limiter
    pub rate_limiter: Arc<FixedWindowRateLimiter>,

    // ── Cache ────────────────────────────────────────────────
    /// Principal cache, checked by the health endpoint
    pub cache: UserCache,

    // ── Services ─────────────────────────────────────────────
    /// Registration, activation and login
    pub account_service: Arc<AccountService>,
    /// Principal lookup, follows, feed
    pub user_service: Arc<UserService>,
    /// Posts
    pub post_service: Arc<PostService>,
    /// Comments
    pub comment_service: Arc<CommentService>,
}

impl AppState {
    /// Wire every service over the bound storage.
    pub fn new(
        config: AppConfig,
        storage: Storage,
        cache: UserCache,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth.token)),
            basic_credentials: Arc::new(StaticCredentials::from_config(&config.auth.basic)),
            rate_limiter: Arc::new(FixedWindowRateLimiter::from_config(&config.rate_limiter)),
            account_service: Arc::new(AccountService::new(&storage, &config, mailer)),
            user_service: Arc::new(UserService::new(&storage, cache.clone())),
            cache,
            post_service: Arc::new(PostService::new(&storage)),
            comment_service: Arc::new(CommentService::new(&storage)),
            config: Arc::new(config),
        }
    }
}

//! Route definitions for the social HTTP API.
//!
//! All routes are organized by domain and mounted under `/v1`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// The rate limiter runs before any extractor, so rejected requests never
/// reach authentication.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/v1", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Operator probe
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Registration and session tokens
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/authentication/user", post(handlers::auth::register_user))
        .route("/authentication/token", post(handlers::auth::create_token))
}

/// Activation, lookup, follows, feed
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/activate/{token}", put(handlers::user::activate_user))
        .route("/users/feed", get(handlers::user::feed))
        .route(
            "/users/{id}",
            get(handlers::user::get_user).delete(handlers::user::delete_user),
        )
        .route("/users/{id}/follow", put(handlers::user::follow_user))
        .route("/users/{id}/unfollow", put(handlers::user::unfollow_user))
}

/// Posts and comments
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::post::create_post))
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .patch(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route("/posts/{id}/comments", post(handlers::post::create_comment))
}

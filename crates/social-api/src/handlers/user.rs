//! User handlers: activation, lookup, follows, feed and deletion.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use social_core::error::AppError;
use social_core::types::FeedQuery;
use social_entity::{FeedItem, User};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// PUT /v1/users/activate/{token}
pub async fn activate_user(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.account_service.activate(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.get_user(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete_user(auth.context(), parse_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/users/{id}/follow
pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .follow(auth.context(), parse_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/users/{id}/unfollow
pub async fn unfollow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .unfollow(auth.context(), parse_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/users/feed
pub async fn feed(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<FeedItem>>>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let items = state.user_service.feed(auth.context(), &query).await?;
    Ok(Json(ApiResponse::ok(items)))
}

//! Post and comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use social_entity::{Comment, Post, PostDetail};

use crate::dto::request::{CreateCommentRequest, CreatePostRequest, UpdatePostRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), ApiError> {
    let post = state
        .post_service
        .create(auth.context(), req.title, req.content, req.tags)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// GET /v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PostDetail>>, ApiError> {
    let detail = state.post_service.get_with_comments(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// PATCH /v1/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let post = state
        .post_service
        .update(auth.context(), parse_id(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// DELETE /v1/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .post_service
        .delete(auth.context(), parse_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), ApiError> {
    let comment = state
        .comment_service
        .create(auth.context(), parse_id(&id)?, req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment))))
}

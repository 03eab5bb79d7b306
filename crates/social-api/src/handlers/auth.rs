//! Authentication handlers: registration and session token issuance.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use social_service::Registration;

use crate::dto::request::{CreateTokenRequest, RegisterUserRequest};
use crate::dto::response::{ApiResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /v1/authentication/user
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Registration>>), ApiError> {
    let registration = state.account_service.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(registration))))
}

/// POST /v1/authentication/token
pub async fn create_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTokenRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TokenResponse>>), ApiError> {
    let issued = state
        .account_service
        .login(&req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(issued.into()))))
}

//! `AdminAuth` extractor: static Basic credentials for operator routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use social_auth::credentials::{CredentialError, parse_basic};
use social_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the request carried the configured Basic credentials.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// The username that was presented.
    pub username: String,
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let reject = |e: CredentialError| ApiError::basic_challenge(AppError::from(e));

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(CredentialError::MissingHeader)
            .map_err(reject)?;

        let presented = parse_basic(header).map_err(reject)?;
        state.basic_credentials.verify(&presented).map_err(reject)?;

        Ok(AdminAuth {
            username: presented.username,
        })
    }
}

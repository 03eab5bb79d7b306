//! `AuthUser` extractor: resolves the bearer token to a principal.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use social_auth::credentials::{CredentialError, parse_bearer};
use social_core::error::{AppError, ErrorKind};
use social_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(CredentialError::MissingHeader)
            .map_err(AppError::from)?;

        let token = parse_bearer(header).map_err(AppError::from)?;
        let claims = state.jwt_decoder.validate(token)?;
        let user_id = claims.user_id()?;

        // The subject must still exist; a deleted principal's token is dead.
        let user = state
            .user_service
            .get_user(user_id)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => AppError::authentication("token subject no longer exists"),
                _ => e,
            })?;

        debug!(user_id, "Bearer token accepted");

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let ip_address = state.rate_limiter.key_for(&parts.headers, peer);
        Ok(AuthUser(RequestContext::new(user, ip_address)))
    }
}

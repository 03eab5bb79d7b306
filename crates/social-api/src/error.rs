//! Maps domain `AppError` to HTTP responses.
//!
//! Authentication, authorization, not-found and server-side failures are
//! answered with fixed messages; the detailed message only reaches the logs.
//! Validation, conflict and rate-limit messages are safe to echo.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use social_core::error::{AppError, ErrorKind};

/// Challenge sent with 401s from Basic-authenticated routes.
pub const BASIC_CHALLENGE: &str = r#"Basic realm="restricted", charset="UTF-8""#;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    inner: AppError,
    challenge: Option<&'static str>,
    retry_after: Option<u64>,
}

impl ApiError {
    /// A 401 that asks the client for Basic credentials.
    pub fn basic_challenge(inner: AppError) -> Self {
        Self {
            inner,
            challenge: Some(BASIC_CHALLENGE),
            retry_after: None,
        }
    }

    /// A 429 telling the client when to come back.
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self {
            inner: AppError::rate_limit("rate limit exceeded"),
            challenge: None,
            retry_after: Some(retry_after_secs),
        }
    }

    /// The wrapped domain error.
    pub fn inner(&self) -> &AppError {
        &self.inner
    }
}

impl From<AppError> for ApiError {
    fn from(inner: AppError) -> Self {
        Self {
            inner,
            challenge: None,
            retry_after: None,
        }
    }
}

/// Status code and the message the client is allowed to see.
fn classify(err: &AppError) -> (StatusCode, String) {
    match err.kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, err.message.clone()),
        ErrorKind::Conflict => (StatusCode::CONFLICT, err.message.clone()),
        ErrorKind::RateLimit => (StatusCode::TOO_MANY_REQUESTS, err.message.clone()),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "forbidden".to_string()),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
        ErrorKind::Timeout
        | ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::ExternalService => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "the server encountered a problem and could not process your request".to_string(),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = classify(&self.inner);

        if status.is_server_error() {
            error!(kind = %self.inner.kind, error = %self.inner.message, "Request failed");
        } else {
            warn!(kind = %self.inner.kind, error = %self.inner.message, "Request rejected");
        }

        let body = ApiErrorResponse {
            error: self.inner.kind.to_string(),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(challenge) = self.challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        if let Some(secs) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

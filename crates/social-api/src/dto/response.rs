//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use social_auth::IssuedToken;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a payload.
    pub fn ok(data: T) -> Self {
        Self { data }
    }
}

/// A signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Compact JWT.
    pub token: String,
    /// Expiration time.
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

/// Health probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the cache backend is unreachable.
    pub status: String,
    /// Deployment environment.
    pub env: String,
    /// `ok`, `unavailable` or `disabled`.
    pub cache: String,
    /// Server version.
    pub version: String,
}

//! Session token issuance.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use social_core::config::auth::TokenConfig;
use social_core::error::AppError;

use super::claims::Claims;

/// A signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact JWS.
    pub token: String,
    /// When the token stops validating.
    pub expires_at: DateTime<Utc>,
}

/// Creates HS256-signed session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token lifetime.
    lifetime: chrono::Duration,
    /// `iss` and `aud` value.
    issuer: String,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("lifetime", &self.lifetime)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from token configuration.
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            lifetime: chrono::Duration::hours(config.lifetime_hours as i64),
            issuer: config.issuer.clone(),
        }
    }

    /// Issue a session token for `user_id`, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        let claims = Claims::new(user_id, Utc::now(), self.lifetime, &self.issuer);
        let token = self.sign(&claims)?;
        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Sign an arbitrary claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))
    }
}

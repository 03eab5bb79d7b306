//! JWT claims structure used in session tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use social_core::error::AppError;

/// Claims payload embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal id, as a decimal string.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
}

impl Claims {
    /// Build claims for `user_id` valid from `now` for `lifetime`.
    pub fn new(
        user_id: i64,
        now: DateTime<Utc>,
        lifetime: chrono::Duration,
        issuer: &str,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
            aud: issuer.to_string(),
        }
    }

    /// Returns the principal id from the subject claim.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::authentication(format!("Invalid subject claim '{}'", self.sub)))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

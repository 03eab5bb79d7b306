//! Session token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use social_core::config::auth::TokenConfig;
use social_core::error::AppError;

use super::claims::Claims;

/// Clock skew tolerated on `exp` and `nbf`, in seconds.
const LEEWAY_SECONDS: u64 = 5;

/// Validates session tokens: signature, time window, issuer, and audience.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from token configuration.
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = LEEWAY_SECONDS;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token. Every failure is an authentication error.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::authentication("Token has expired"),
                JwtErrorKind::ImmatureSignature => AppError::authentication("Token not yet valid"),
                JwtErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                JwtErrorKind::InvalidIssuer => AppError::authentication("Invalid token issuer"),
                JwtErrorKind::InvalidAudience => AppError::authentication("Invalid token audience"),
                JwtErrorKind::InvalidToken => AppError::authentication("Invalid token format"),
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(data.claims)
    }
}

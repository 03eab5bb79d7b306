//! Parsers for the `Bearer` and `Basic` authorization schemes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use social_core::error::AppError;

/// Why a presented credential was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No `Authorization` header was sent.
    #[error("authorization header is missing")]
    MissingHeader,
    /// The header is not `<scheme> <value>`.
    #[error("authorization header is malformed")]
    MalformedHeader,
    /// The scheme is not the one this endpoint accepts.
    #[error("unsupported authorization scheme '{0}'")]
    UnsupportedScheme(String),
    /// The Basic payload is not valid base64 or UTF-8.
    #[error("credentials are not valid base64")]
    InvalidEncoding,
    /// The decoded Basic payload has no `:` separator.
    #[error("credentials must be 'username:password'")]
    InvalidFormat,
    /// The credentials do not match.
    #[error("invalid credentials")]
    Mismatch,
    /// No static credentials are configured, so none can match.
    #[error("static credentials are not configured")]
    NotConfigured,
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::authentication(err.to_string())
    }
}

/// A decoded `Basic` credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Presented username.
    pub username: String,
    /// Presented password.
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Split `<scheme> <value>`, requiring exactly two space-separated parts.
fn split_scheme(header: &str) -> Result<(&str, &str), CredentialError> {
    let mut parts = header.trim().split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(value), None) if !scheme.is_empty() && !value.is_empty() => {
            Ok((scheme, value))
        }
        _ => Err(CredentialError::MalformedHeader),
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Result<&str, CredentialError> {
    let (scheme, token) = split_scheme(header)?;
    if scheme != "Bearer" {
        return Err(CredentialError::UnsupportedScheme(scheme.to_string()));
    }
    Ok(token)
}

/// Decode a `Basic <base64(user:pass)>` header value.
///
/// The pair is split on the first `:`, so passwords may contain colons.
pub fn parse_basic(header: &str) -> Result<BasicCredentials, CredentialError> {
    let (scheme, payload) = split_scheme(header)?;
    if scheme != "Basic" {
        return Err(CredentialError::UnsupportedScheme(scheme.to_string()));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| CredentialError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| CredentialError::InvalidEncoding)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(CredentialError::InvalidFormat)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

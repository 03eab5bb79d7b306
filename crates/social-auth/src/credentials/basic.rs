//! Static credentials for administrative endpoints.

use subtle::ConstantTimeEq;

use social_core::config::auth::BasicAuthConfig;

use super::header::{BasicCredentials, CredentialError};

/// The single username/password pair configured for Basic-authenticated routes.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl StaticCredentials {
    /// Creates the credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates the credential pair from configuration.
    pub fn from_config(config: &BasicAuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Whether a non-empty pair is configured.
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Check a presented pair. Both fields must match exactly.
    ///
    /// Fails closed when nothing is configured.
    pub fn verify(&self, presented: &BasicCredentials) -> Result<(), CredentialError> {
        if !self.is_configured() {
            return Err(CredentialError::NotConfigured);
        }
        let username_ok = constant_time_eq(self.username.as_bytes(), presented.username.as_bytes());
        let password_ok = constant_time_eq(self.password.as_bytes(), presented.password.as_bytes());
        if username_ok & password_ok {
            Ok(())
        } else {
            Err(CredentialError::Mismatch)
        }
    }
}

/// Length is not secret; contents are compared without early exit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

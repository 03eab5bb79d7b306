//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as ParsedHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use social_core::config::auth::AuthConfig;
use social_core::error::AppError;
use social_entity::PasswordHash;

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Longest accepted input, in bytes.
    max_length: usize,
}

impl PasswordHasher {
    /// Creates a hasher accepting inputs up to `max_length` bytes.
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Creates a hasher from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.password_max_length)
    }

    /// Hashes a plaintext password using Argon2id with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<PasswordHash, AppError> {
        if password.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }
        if password.len() > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} bytes long",
                self.max_length
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(PasswordHash::from_encoded(hash.to_string()))
    }

    /// Verifies a candidate password against a stored hash.
    ///
    /// A malformed stored hash is reported as a mismatch.
    pub fn verify_password(&self, hash: &PasswordHash, candidate: &str) -> bool {
        let Ok(parsed) = ParsedHash::new(hash.as_str()) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

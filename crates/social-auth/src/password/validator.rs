//! Password length policy for new passwords.

use social_core::config::auth::AuthConfig;
use social_core::error::AppError;

/// Validates password length against configured bounds.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in bytes.
    min_length: usize,
    /// Maximum password length in bytes.
    max_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Validates a password, returning the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if password.len() > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} bytes long",
                self.max_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let validator = PasswordValidator::new(&AuthConfig::default());
        assert!(validator.validate("ab").is_err());
        assert!(validator.validate("abc").is_ok());
        assert!(validator.validate("secret123").is_ok());
        assert!(validator.validate(&"x".repeat(73)).is_err());
    }
}

//! Unified application error types for the social API.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Callers branch on [`ErrorKind`] and,
//! for conflicts, on [`ConflictReason`]; the message text is for logs and
//! for the safe subset of responses that echo it.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found (includes expired or consumed tokens).
    NotFound,
    /// Authentication failed (missing, malformed, invalid or expired credential).
    Authentication,
    /// The caller is authenticated but lacks privilege for the action.
    Authorization,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// A rate limit was exceeded.
    RateLimit,
    /// A store-bound operation exceeded its time budget.
    Timeout,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external service (mail relay) error occurred.
    ExternalService,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "UNAUTHORIZED"),
            Self::Authorization => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
        }
    }
}

/// The specific condition behind a [`ErrorKind::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Another principal already uses this email address.
    DuplicateEmail,
    /// Another principal already uses this username.
    DuplicateUsername,
    /// The follow relationship already exists.
    DuplicateFollow,
    /// The stored version no longer matches the expected version.
    VersionMismatch,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEmail => write!(f, "a user with that email already exists"),
            Self::DuplicateUsername => write!(f, "a user with that username already exists"),
            Self::DuplicateFollow => write!(f, "already following this user"),
            Self::VersionMismatch => write!(f, "the resource was modified or no longer exists"),
        }
    }
}

/// The unified application error.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Named conflict condition, set only for [`ErrorKind::Conflict`].
    pub reason: Option<ConflictReason>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reason: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            reason: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication (401) error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization (403) error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error without a named reason.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a conflict error carrying a named reason.
    pub fn conflict_with(reason: ConflictReason) -> Self {
        Self {
            kind: ErrorKind::Conflict,
            message: reason.to_string(),
            reason: Some(reason),
            source: None,
        }
    }

    /// Create a rate-limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimit, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Whether this error is a conflict with the given reason.
    pub fn is_conflict(&self, reason: ConflictReason) -> bool {
        self.kind == ErrorKind::Conflict && self.reason == Some(reason)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            reason: self.reason,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::with_source(ErrorKind::Timeout, "operation timed out", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_reason_is_carried() {
        let err = AppError::conflict_with(ConflictReason::DuplicateEmail);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.is_conflict(ConflictReason::DuplicateEmail));
        assert!(!err.is_conflict(ConflictReason::DuplicateUsername));
    }

    #[test]
    fn test_clone_keeps_kind_and_reason() {
        let err = AppError::conflict_with(ConflictReason::VersionMismatch);
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Conflict);
        assert_eq!(cloned.reason, Some(ConflictReason::VersionMismatch));
    }

    #[test]
    fn test_display_uses_code() {
        let err = AppError::authentication("token expired");
        assert_eq!(err.to_string(), "UNAUTHORIZED: token expired");
    }

    #[tokio::test]
    async fn test_elapsed_maps_to_timeout() {
        let elapsed = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            std::future::pending::<()>(),
        )
        .await
        .unwrap_err();
        let err: AppError = elapsed.into();
        assert_eq!(err.kind, ErrorKind::Timeout);
    }
}

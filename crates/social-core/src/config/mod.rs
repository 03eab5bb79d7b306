//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The loaded [`AppConfig`] is immutable and shared behind an `Arc`.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod mail;
pub mod rate_limit;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::cache::CacheConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::mail::MailConfig;
use self::rate_limit::RateLimiterConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Principal cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Request rate limiter settings.
    #[serde(default)]
    pub rate_limiter: RateLimiterConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SOCIAL__`
    /// (e.g. `SOCIAL__AUTH__TOKEN__SECRET`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SOCIAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.token.secret.is_empty() {
            return Err(AppError::configuration("auth.token.secret must be set"));
        }
        if self.auth.password_min_length == 0
            || self.auth.password_min_length > self.auth.password_max_length
        {
            return Err(AppError::configuration(
                "auth.password_min_length must be between 1 and auth.password_max_length",
            ));
        }
        if self.rate_limiter.enabled && self.rate_limiter.requests_per_time_frame == 0 {
            return Err(AppError::configuration(
                "rate_limiter.requests_per_time_frame must be positive when enabled",
            ));
        }
        Ok(())
    }
}

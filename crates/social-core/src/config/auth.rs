//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token signing settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Static credentials guarding administrative endpoints.
    #[serde(default)]
    pub basic: BasicAuthConfig,
    /// Lifetime of an activation invitation in minutes.
    #[serde(default = "default_invitation_ttl")]
    pub invitation_ttl_minutes: u64,
    /// Minimum password length in bytes.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length in bytes.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::default(),
            basic: BasicAuthConfig::default(),
            invitation_ttl_minutes: default_invitation_ttl(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
        }
    }
}

/// Session token (JWT) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC-SHA256 signing secret.
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Token lifetime in hours.
    #[serde(default = "default_lifetime")]
    pub lifetime_hours: u64,
    /// Value used for both the `iss` and `aud` claims.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            lifetime_hours: default_lifetime(),
            issuer: default_issuer(),
        }
    }
}

/// Static `user:pass` credentials for the basic-auth guard.
///
/// Empty values reject every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicAuthConfig {
    /// Expected username.
    #[serde(default)]
    pub username: String,
    /// Expected password.
    #[serde(default)]
    pub password: String,
}

fn default_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_lifetime() -> u64 {
    72
}

fn default_issuer() -> String {
    "socialnetwork".to_string()
}

fn default_invitation_ttl() -> u64 {
    5
}

fn default_password_min() -> usize {
    3
}

fn default_password_max() -> usize {
    72
}

//! Request rate limiter configuration.

use serde::{Deserialize, Serialize};

/// Fixed-window rate limiter settings, applied per client address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Whether the limiter is active.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Requests admitted per window.
    #[serde(default = "default_requests")]
    pub requests_per_time_frame: u32,
    /// Window length in seconds.
    #[serde(default = "default_time_frame")]
    pub time_frame_seconds: u64,
    /// Key clients on the first `X-Forwarded-For` hop instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests_per_time_frame: default_requests(),
            time_frame_seconds: default_time_frame(),
            trust_forwarded_for: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_requests() -> u32 {
    20
}

fn default_time_frame() -> u64 {
    5
}

//! Fixed-window rate limiter middleware.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::warn;

use social_core::config::rate_limit::RateLimiterConfig;

use crate::error::ApiError;
use crate::state::AppState;

/// Counts requests per client key in fixed windows.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    /// Client key → current window.
    windows: DashMap<String, Window>,
    /// Requests admitted per window.
    limit: u32,
    /// Window length.
    frame: Duration,
    /// When false every request is admitted.
    enabled: bool,
    /// Whether `X-Forwarded-For` names the client.
    trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl FixedWindowRateLimiter {
    /// Creates a limiter admitting `limit` requests per `frame` for each key.
    pub fn new(limit: u32, frame: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            frame,
            enabled: true,
            trust_forwarded_for: false,
        }
    }

    /// Creates a limiter from configuration.
    pub fn from_config(config: &RateLimiterConfig) -> Self {
        Self {
            enabled: config.enabled,
            trust_forwarded_for: config.trust_forwarded_for,
            ..Self::new(
                config.requests_per_time_frame,
                Duration::from_secs(config.time_frame_seconds),
            )
        }
    }

    /// Key for the client behind `headers` and `peer`.
    pub fn key_for(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        client_key(headers, peer, self.trust_forwarded_for)
    }

    /// Whether the limiter is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Count one request for `key`. Returns whether it is admitted and,
    /// when it is not, how long until the window resets.
    pub fn allow(&self, key: &str) -> (bool, Duration) {
        if !self.enabled {
            return (true, Duration::ZERO);
        }

        let now = Instant::now();
        let mut window = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.duration_since(window.started);
        if elapsed >= self.frame {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count < self.limit {
            window.count += 1;
            (true, Duration::ZERO)
        } else {
            (false, self.frame.saturating_sub(now.duration_since(window.started)))
        }
    }

    /// Drop windows that have already ended.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.started) < self.frame);
    }
}

/// The peer address, else `unknown`.
///
/// With `trust_forwarded_for` the first `X-Forwarded-For` hop wins over the
/// peer. The header is client-controlled unless a proxy rewrites it.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    let forwarded = if trust_forwarded_for {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    } else {
        None
    };

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rejects requests over the per-client budget with 429 and `Retry-After`.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limiter = &state.rate_limiter;
    if !limiter.is_enabled() {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = limiter.key_for(request.headers(), peer);

    let (allowed, retry_after) = limiter.allow(&key);
    if !allowed {
        let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
        warn!(client = %key, retry_after_secs = secs, "Rate limit exceeded");
        return ApiError::rate_limited(secs).into_response();
    }

    next.run(request).await
}

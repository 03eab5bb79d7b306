//! Basic-authenticated health probe and the rate limiter.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use social_cache::memory::MemoryCacheProvider;
use social_cache::{CacheManager, UserCache};
use social_core::config::cache::MemoryCacheConfig;

use crate::helpers::{Auth, ScriptedMailer, TestApp, test_config};

#[tokio::test]
async fn test_health_requires_static_credentials() {
    let app = TestApp::new();

    let ok = app.request("GET", "/v1/health", None, Auth::Basic("admin", "admin")).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["status"], "ok");
    assert_eq!(ok.body["data"]["env"], "local");
    assert_eq!(ok.body["data"]["cache"], "disabled");

    let missing = app.request("GET", "/v1/health", None, Auth::None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.headers["www-authenticate"],
        r#"Basic realm="restricted", charset="UTF-8""#
    );

    let wrong = app.request("GET", "/v1/health", None, Auth::Basic("admin", "nope")).await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert!(wrong.headers.contains_key("www-authenticate"));
}

#[tokio::test]
async fn test_health_reports_cache_backend() {
    let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 16 });
    let cache = UserCache::new(
        CacheManager::from_provider(Arc::new(provider)),
        Duration::from_secs(60),
    );
    let app = TestApp::build_with_cache(test_config(), ScriptedMailer::default(), cache);

    let ok = app.request("GET", "/v1/health", None, Auth::Basic("admin", "admin")).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["status"], "ok");
    assert_eq!(ok.body["data"]["cache"], "ok");
}

#[tokio::test]
async fn test_health_fails_closed_without_configured_credentials() {
    let mut config = test_config();
    config.auth.basic.username.clear();
    config.auth.basic.password.clear();
    let app = TestApp::build(config, ScriptedMailer::default());

    let response = app.request("GET", "/v1/health", None, Auth::Basic("", "")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_rejects_over_budget() {
    let mut config = test_config();
    config.rate_limiter.enabled = true;
    config.rate_limiter.requests_per_time_frame = 2;
    config.rate_limiter.time_frame_seconds = 60;
    let app = TestApp::build(config, ScriptedMailer::default());

    for _ in 0..2 {
        let response = app.request("GET", "/v1/health", None, Auth::Basic("admin", "admin")).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    // Rejected before credentials are even looked at.
    let limited = app.request("GET", "/v1/health", None, Auth::None).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["error"], "RATE_LIMIT");
    let retry_after: u64 = limited.headers["retry-after"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
}

#[tokio::test]
async fn test_rate_limit_ignores_rotating_forwarded_for() {
    let mut config = test_config();
    config.rate_limiter.enabled = true;
    config.rate_limiter.requests_per_time_frame = 1;
    config.rate_limiter.time_frame_seconds = 60;
    let app = TestApp::build(config, ScriptedMailer::default());

    let mut statuses = Vec::new();
    for i in 0..5 {
        let forwarded = format!("1.1.1.{i}");
        let response = app
            .request_with_headers(
                "GET",
                "/v1/health",
                None,
                Auth::Basic("admin", "admin"),
                &[("x-forwarded-for", forwarded.as_str())],
            )
            .await;
        statuses.push(response.status);
    }

    assert_eq!(statuses[0], StatusCode::OK);
    assert!(statuses[1..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}

#[tokio::test]
async fn test_trusted_proxy_keys_on_forwarded_for() {
    let mut config = test_config();
    config.rate_limiter.enabled = true;
    config.rate_limiter.requests_per_time_frame = 1;
    config.rate_limiter.time_frame_seconds = 60;
    config.rate_limiter.trust_forwarded_for = true;
    let app = TestApp::build(config, ScriptedMailer::default());

    for client in ["198.51.100.1", "198.51.100.2"] {
        let response = app
            .request_with_headers(
                "GET",
                "/v1/health",
                None,
                Auth::Basic("admin", "admin"),
                &[("x-forwarded-for", client)],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

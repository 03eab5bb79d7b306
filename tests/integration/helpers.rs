//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use social_api::{AppState, build_app};
use social_cache::UserCache;
use social_core::config::AppConfig;
use social_core::error::AppError;
use social_core::result::AppResult;
use social_database::MemoryStore;
use social_service::Mailer;

/// An email the scripted mailer accepted.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub template: String,
    pub recipient: String,
    pub vars: Value,
    pub sandbox: bool,
}

/// Mailer that records messages, or fails every send when told to.
#[derive(Debug, Default)]
pub struct ScriptedMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<SentMail>>,
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn send(
        &self,
        template: &str,
        _recipient_name: &str,
        recipient_address: &str,
        vars: &Value,
        sandbox: bool,
    ) -> AppResult<u16> {
        if self.fail {
            return Err(AppError::external_service("relay unreachable"));
        }
        self.sent.lock().await.push(SentMail {
            template: template.to_string(),
            recipient: recipient_address.to_string(),
            vars: vars.clone(),
            sandbox,
        });
        Ok(200)
    }
}

/// How a request authenticates.
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    Basic(&'a str, &'a str),
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: MemoryStore,
    /// Mail sink
    pub mailer: Arc<ScriptedMailer>,
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Configuration every test starts from.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.token.secret = "integration-secret".to_string();
    config.auth.basic.username = "admin".to_string();
    config.auth.basic.password = "admin".to_string();
    config.rate_limiter.enabled = false;
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::build(test_config(), ScriptedMailer::default())
    }

    /// Create a test application with custom configuration and mailer.
    pub fn build(config: AppConfig, mailer: ScriptedMailer) -> Self {
        let cache = UserCache::disabled(std::time::Duration::from_secs(60));
        Self::build_with_cache(config, mailer, cache)
    }

    /// Create a test application over a specific principal cache.
    pub fn build_with_cache(config: AppConfig, mailer: ScriptedMailer, cache: UserCache) -> Self {
        let store = MemoryStore::new();
        let mailer = Arc::new(mailer);
        let state = AppState::new(config, store.storage(), cache, mailer.clone());

        Self {
            router: build_app(state),
            store,
            mailer,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Auth<'_>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, auth, &[]).await
    }

    /// Make an HTTP request with extra headers. Every request arrives from
    /// the same peer address.
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Auth<'_>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        match auth {
            Auth::None => {}
            Auth::Bearer(token) => {
                req = req.header("Authorization", format!("Bearer {token}"));
            }
            Auth::Basic(user, pass) => {
                let encoded = STANDARD.encode(format!("{user}:{pass}"));
                req = req.header("Authorization", format!("Basic {encoded}"));
            }
        }

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let mut req = req.body(Body::from(body_str)).expect("Failed to build request");
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register a user and return `(user_id, activation_token)`.
    pub async fn register(&self, username: &str) -> (i64, String) {
        let response = self
            .request(
                "POST",
                "/v1/authentication/user",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@x.com"),
                    "password": "secret123",
                })),
                Auth::None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );

        let id = response.body["data"]["user"]["id"]
            .as_i64()
            .expect("No user id in registration response");
        let token = response.body["data"]["token"]
            .as_str()
            .expect("No token in registration response")
            .to_string();
        (id, token)
    }

    /// Log in and return the session token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .request(
                "POST",
                "/v1/authentication/token",
                Some(serde_json::json!({
                    "email": format!("{username}@x.com"),
                    "password": "secret123",
                })),
                Auth::None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Register, activate and log in. Returns `(user_id, session_token)`.
    pub async fn signed_in(&self, username: &str) -> (i64, String) {
        let (id, activation) = self.register(username).await;
        let response = self
            .request(
                "PUT",
                &format!("/v1/users/activate/{activation}"),
                None,
                Auth::None,
            )
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        (id, self.login(username).await)
    }
}

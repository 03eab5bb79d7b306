//! Registration, activation and session token flows.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{Auth, ScriptedMailer, TestApp, test_config};

#[tokio::test]
async fn test_alice_end_to_end() {
    let app = TestApp::new();

    let (alice_id, activation) = app.register("alice").await;

    {
        let sent = app.mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].template, "user_invitation");
        assert_eq!(sent[0].recipient, "alice@x.com");
        assert!(sent[0].sandbox);
        assert_eq!(
            sent[0].vars["activation_url"],
            format!("http://localhost:4000/confirm/{activation}")
        );
    }

    // The raw token is never what the store keeps.
    let keys = app.store.invitation_keys().await;
    assert_eq!(keys.len(), 1);
    assert_ne!(keys[0], activation);

    let inactive_login = app
        .request(
            "POST",
            "/v1/authentication/token",
            Some(json!({ "email": "alice@x.com", "password": "secret123" })),
            Auth::None,
        )
        .await;
    assert_eq!(inactive_login.status, StatusCode::UNAUTHORIZED);

    let path = format!("/v1/users/activate/{activation}");
    let first = app.request("PUT", &path, None, Auth::None).await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);

    let token = app.login("alice").await;
    let me = app
        .request("GET", &format!("/v1/users/{alice_id}"), None, Auth::Bearer(&token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "alice");
    assert_eq!(me.body["data"]["is_active"], true);
    assert!(me.body["data"].get("password").is_none());

    let second = app.request("PUT", &path, None, Auth::None).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(second.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_email_and_username_conflict() {
    let app = TestApp::new();
    app.register("alice").await;

    let same_email = app
        .request(
            "POST",
            "/v1/authentication/user",
            Some(json!({ "username": "alice2", "email": "alice@x.com", "password": "secret123" })),
            Auth::None,
        )
        .await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
    assert_eq!(same_email.body["message"], "a user with that email already exists");

    let same_name = app
        .request(
            "POST",
            "/v1/authentication/user",
            Some(json!({ "username": "alice", "email": "other@x.com", "password": "secret123" })),
            Auth::None,
        )
        .await;
    assert_eq!(same_name.status, StatusCode::CONFLICT);
    assert_eq!(same_name.body["message"], "a user with that username already exists");

    assert_eq!(app.store.invitation_keys().await.len(), 1);
}

#[tokio::test]
async fn test_mailer_failure_rolls_back_registration() {
    let app = TestApp::build(
        test_config(),
        ScriptedMailer {
            fail: true,
            ..Default::default()
        },
    );

    let response = app
        .request(
            "POST",
            "/v1/authentication/user",
            Some(json!({ "username": "alice", "email": "alice@x.com", "password": "secret123" })),
            Auth::None,
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.store.invitation_keys().await.is_empty());
}

#[tokio::test]
async fn test_registration_payload_validation() {
    let app = TestApp::new();

    for body in [
        json!({ "username": "alice", "email": "not-an-email", "password": "secret123" }),
        json!({ "username": "alice", "email": "alice@x.com", "password": "ab" }),
        json!({ "username": "x".repeat(101), "email": "alice@x.com", "password": "secret123" }),
        json!({ "username": "alice" }),
    ] {
        let response = app
            .request("POST", "/v1/authentication/user", Some(body), Auth::None)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "VALIDATION");
    }
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_alike() {
    let app = TestApp::new();
    app.signed_in("alice").await;

    let wrong = app
        .request(
            "POST",
            "/v1/authentication/token",
            Some(json!({ "email": "alice@x.com", "password": "wrong-pass" })),
            Auth::None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/v1/authentication/token",
            Some(json!({ "email": "bob@x.com", "password": "secret123" })),
            Auth::None,
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
}

#[tokio::test]
async fn test_bad_bearer_tokens_are_unauthorized() {
    let app = TestApp::new();
    let (alice_id, _) = app.signed_in("alice").await;
    let path = format!("/v1/users/{alice_id}");

    let missing = app.request("GET", &path, None, Auth::None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app.request("GET", &path, None, Auth::Bearer("abc.def.ghi")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["message"], "unauthorized");

    let wrong_scheme = app.request("GET", &path, None, Auth::Basic("admin", "admin")).await;
    assert_eq!(wrong_scheme.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let app = TestApp::new();
    let (alice_id, token) = app.signed_in("alice").await;

    let deleted = app
        .request("DELETE", &format!("/v1/users/{alice_id}"), None, Auth::Bearer(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let after = app
        .request("GET", &format!("/v1/users/{alice_id}"), None, Auth::Bearer(&token))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

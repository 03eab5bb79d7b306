//! Posts, optimistic concurrency, comments and role precedence.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{Auth, TestApp};

async fn create_post(app: &TestApp, token: &str, title: &str) -> i64 {
    let response = app
        .request(
            "POST",
            "/v1/posts",
            Some(json!({ "title": title, "content": "hello", "tags": ["rust"] })),
            Auth::Bearer(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["version"], 0);
    response.body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_stale_version_conflicts() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice").await;
    let post_id = create_post(&app, &token, "first").await;
    let path = format!("/v1/posts/{post_id}");

    let updated = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "title": "second", "version": 0 })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["version"], 1);
    assert_eq!(updated.body["data"]["title"], "second");
    assert_eq!(updated.body["data"]["content"], "hello");

    let stale = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "title": "third", "version": 0 })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);

    let current = app.request("GET", &path, None, Auth::Bearer(&token)).await;
    assert_eq!(current.body["data"]["title"], "second");
    assert_eq!(current.body["data"]["version"], 1);
}

#[tokio::test]
async fn test_concurrent_patches_exactly_one_wins() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice").await;
    let post_id = create_post(&app, &token, "t").await;
    let path = format!("/v1/posts/{post_id}");

    for i in 0..3 {
        let response = app
            .request("PATCH", &path, Some(json!({ "content": format!("v{i}") })), Auth::Bearer(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let (a, b) = tokio::join!(
        app.request("PATCH", &path, Some(json!({ "title": "a", "version": 3 })), Auth::Bearer(&token)),
        app.request("PATCH", &path, Some(json!({ "title": "b", "version": 3 })), Auth::Bearer(&token)),
    );

    let mut statuses = [a.status.as_u16(), b.status.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 409]);

    let winner = if a.status == StatusCode::OK { a } else { b };
    assert_eq!(winner.body["data"]["version"], 4);
}

#[tokio::test]
async fn test_ownership_and_role_precedence() {
    let app = TestApp::new();
    let (_, alice) = app.signed_in("alice").await;
    let (bob_id, bob) = app.signed_in("bob").await;
    let post_id = create_post(&app, &alice, "mine").await;
    let path = format!("/v1/posts/{post_id}");

    let forbidden = app
        .request("PATCH", &path, Some(json!({ "title": "hijack" })), Auth::Bearer(&bob))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["message"], "forbidden");

    app.store.assign_role(bob_id, "moderator").await.unwrap();

    let moderated = app
        .request("PATCH", &path, Some(json!({ "title": "moderated" })), Auth::Bearer(&bob))
        .await;
    assert_eq!(moderated.status, StatusCode::OK);

    let delete_as_moderator = app.request("DELETE", &path, None, Auth::Bearer(&bob)).await;
    assert_eq!(delete_as_moderator.status, StatusCode::FORBIDDEN);

    app.store.assign_role(bob_id, "admin").await.unwrap();
    let delete_as_admin = app.request("DELETE", &path, None, Auth::Bearer(&bob)).await;
    assert_eq!(delete_as_admin.status, StatusCode::NO_CONTENT);

    let gone = app.request("GET", &path, None, Auth::Bearer(&alice)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments() {
    let app = TestApp::new();
    let (_, alice) = app.signed_in("alice").await;
    let (_, bob) = app.signed_in("bob").await;
    let post_id = create_post(&app, &alice, "t").await;

    let comment = app
        .request(
            "POST",
            &format!("/v1/posts/{post_id}/comments"),
            Some(json!({ "content": "nice" })),
            Auth::Bearer(&bob),
        )
        .await;
    assert_eq!(comment.status, StatusCode::CREATED);
    assert_eq!(comment.body["data"]["username"], "bob");

    let detail = app
        .request("GET", &format!("/v1/posts/{post_id}"), None, Auth::Bearer(&alice))
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["data"]["comments"][0]["content"], "nice");

    let missing = app
        .request(
            "POST",
            "/v1/posts/9999/comments",
            Some(json!({ "content": "nice" })),
            Auth::Bearer(&bob),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let too_long = app
        .request(
            "POST",
            &format!("/v1/posts/{post_id}/comments"),
            Some(json!({ "content": "x".repeat(501) })),
            Auth::Bearer(&bob),
        )
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_post_id_is_bad_request() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice").await;
    let response = app.request("GET", "/v1/posts/abc", None, Auth::Bearer(&token)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

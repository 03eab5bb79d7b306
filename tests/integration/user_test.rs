//! Follows, feed and account deletion.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{Auth, TestApp};

#[tokio::test]
async fn test_follow_and_feed() {
    let app = TestApp::new();
    let (_, alice) = app.signed_in("alice").await;
    let (bob_id, bob) = app.signed_in("bob").await;
    let (_, carol) = app.signed_in("carol").await;

    for (token, title) in [(&alice, "from alice"), (&bob, "from bob"), (&carol, "from carol")] {
        let response = app
            .request(
                "POST",
                "/v1/posts",
                Some(json!({ "title": title, "content": "body" })),
                Auth::Bearer(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let follow = app
        .request("PUT", &format!("/v1/users/{bob_id}/follow"), None, Auth::Bearer(&alice))
        .await;
    assert_eq!(follow.status, StatusCode::NO_CONTENT);

    let again = app
        .request("PUT", &format!("/v1/users/{bob_id}/follow"), None, Auth::Bearer(&alice))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let feed = app.request("GET", "/v1/users/feed", None, Auth::Bearer(&alice)).await;
    assert_eq!(feed.status, StatusCode::OK);
    let titles: Vec<&str> = feed.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["from bob", "from alice"]);
    assert_eq!(feed.body["data"][0]["username"], "bob");
    assert_eq!(feed.body["data"][0]["comments_count"], 0);

    let oldest_first = app
        .request("GET", "/v1/users/feed?sort=asc&limit=1", None, Auth::Bearer(&alice))
        .await;
    assert_eq!(oldest_first.body["data"][0]["title"], "from alice");
    assert_eq!(oldest_first.body["data"].as_array().unwrap().len(), 1);

    let unfollow = app
        .request("PUT", &format!("/v1/users/{bob_id}/unfollow"), None, Auth::Bearer(&alice))
        .await;
    assert_eq!(unfollow.status, StatusCode::NO_CONTENT);

    let feed = app.request("GET", "/v1/users/feed", None, Auth::Bearer(&alice)).await;
    assert_eq!(feed.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_feed_query_bounds() {
    let app = TestApp::new();
    let (_, token) = app.signed_in("alice").await;

    for query in ["limit=0", "limit=21", "offset=-1", "sort=sideways", "limit=abc"] {
        let response = app
            .request("GET", &format!("/v1/users/feed?{query}"), None, Auth::Bearer(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "query {query}");
    }
}

#[tokio::test]
async fn test_follow_edge_cases() {
    let app = TestApp::new();
    let (alice_id, alice) = app.signed_in("alice").await;

    let self_follow = app
        .request("PUT", &format!("/v1/users/{alice_id}/follow"), None, Auth::Bearer(&alice))
        .await;
    assert_eq!(self_follow.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request("PUT", "/v1/users/9999/follow", None, Auth::Bearer(&alice))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_requires_owner_or_admin() {
    let app = TestApp::new();
    let (alice_id, _) = app.signed_in("alice").await;
    let (bob_id, bob) = app.signed_in("bob").await;
    let path = format!("/v1/users/{alice_id}");

    let forbidden = app.request("DELETE", &path, None, Auth::Bearer(&bob)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    app.store.assign_role(bob_id, "admin").await.unwrap();
    let deleted = app.request("DELETE", &path, None, Auth::Bearer(&bob)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let lookup = app.request("GET", &path, None, Auth::Bearer(&bob)).await;
    assert_eq!(lookup.status, StatusCode::NOT_FOUND);
}

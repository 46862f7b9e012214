//! Integration tests for the HTTP surface: routing, status mapping, and
//! response shapes.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["connections"], 0);
}

#[tokio::test]
async fn test_me_requires_identity() {
    let app = helpers::TestApp::new();

    let anonymous = app.request("GET", "/api/users/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "UNAUTHORIZED");

    // A bad token degrades to anonymous rather than failing the request.
    let garbage = app
        .request("GET", "/api/users/me", None, Some("not-a-token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let health = app
        .request("GET", "/api/health", None, Some("not-a-token"))
        .await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;

    let response = app.request("GET", "/api/users/me", None, Some(&alice.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], alice.id.get());
    assert_eq!(response.body["data"]["username"], "alice");
    assert_eq!(response.body["data"]["email"], alice.email);
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_validation() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({ "email": "not-an-email", "password": "pw" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_friends_and_groups_lists() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let carol = app.signup("carol").await;
    app.befriend(&alice, &bob).await;

    let friends = app
        .request("GET", "/api/users/me/friends", None, Some(&alice.token))
        .await;
    assert_eq!(friends.status, StatusCode::OK);
    let friends = friends.body["data"].as_array().unwrap().clone();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["username"], "bob");
    assert!(friends[0].get("email").is_none());

    // Carol is not a friend, so she is left out.
    let group = app.create_group(&alice, "club", &[&bob, &carol]).await;

    let users = app
        .request(
            "GET",
            &format!("/api/groups/{}/users", group.get()),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(users.status, StatusCode::OK);
    let mut names: Vec<String> = users.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["alice", "bob"]);

    let groups = app
        .request("GET", "/api/users/me/groups", None, Some(&carol.token))
        .await;
    assert_eq!(groups.status, StatusCode::OK);
    assert!(groups.body["data"].as_array().unwrap().is_empty());

    let groups = app
        .request("GET", "/api/users/me/groups", None, Some(&bob.token))
        .await;
    assert_eq!(groups.body["data"][0]["name"], "club");
}

#[tokio::test]
async fn test_messages_are_paged_newest_first() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let group = app.create_group(&alice, "notes", &[]).await;
    let path = format!("/api/groups/{}/messages", group.get());

    for i in 1..=5 {
        let response = app
            .request(
                "POST",
                &path,
                Some(serde_json::json!({ "text": format!("note {i}") })),
                Some(&alice.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let first = app
        .request("GET", &format!("{path}?first=2"), None, Some(&alice.token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let page = &first.body["data"];
    assert_eq!(page["edges"][0]["node"]["text"], "note 5");
    assert_eq!(page["edges"][1]["node"]["text"], "note 4");
    assert_eq!(page["page_info"]["has_next_page"], true);
    assert_eq!(page["page_info"]["has_previous_page"], false);

    let cursor = page["edges"][1]["cursor"].as_str().unwrap().to_string();
    let next = app
        .request(
            "GET",
            &format!("{path}?first=10&after={cursor}"),
            None,
            Some(&alice.token),
        )
        .await;
    let page = &next.body["data"];
    assert_eq!(page["edges"].as_array().unwrap().len(), 3);
    assert_eq!(page["edges"][0]["node"]["text"], "note 3");
    assert_eq!(page["page_info"]["has_next_page"], false);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let group = app.create_group(&alice, "notes", &[]).await;

    let response = app
        .request(
            "POST",
            &format!("/api/groups/{}/messages", group.get()),
            Some(serde_json::json!({ "text": "" })),
            Some(&alice.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_last_member_leaving_removes_group() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let group = app.create_group(&alice, "solo", &[]).await;
    let path = format!("/api/groups/{}", group.get());

    let leave = app
        .request("POST", &format!("{path}/leave"), None, Some(&alice.token))
        .await;
    assert_eq!(leave.status, StatusCode::OK);

    let gone = app.request("GET", &path, None, Some(&alice.token)).await;
    assert_eq!(gone.status, StatusCode::UNAUTHORIZED);
}

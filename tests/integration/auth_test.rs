//! Integration tests for tokens, signup, login, and credential rotation.

mod helpers;

use http::StatusCode;

use chatty_auth::{ConnectionParams, TokenCodec};
use chatty_core::config::AuthConfig;
use chatty_core::error::ErrorKind;
use chatty_core::types::UserId;
use chatty_service::SignupInput;
use chatty_store::UserRepository;

#[test]
fn test_minted_token_verifies_to_its_claims() {
    let codec = TokenCodec::new(&AuthConfig {
        jwt_secret: helpers::TEST_SECRET.to_string(),
        ..AuthConfig::default()
    });

    for (id, email, version) in [(1, "a@x.com", 1), (42, "b@y.org", 7), (i64::MAX, "c@z.io", 0)] {
        let token = codec.mint(UserId(id), email, version).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.id, UserId(id));
        assert_eq!(claims.email, email);
        assert_eq!(claims.version, version);
    }
}

#[test]
fn test_token_from_another_secret_is_invalid() {
    let ours = TokenCodec::new(&AuthConfig {
        jwt_secret: helpers::TEST_SECRET.to_string(),
        ..AuthConfig::default()
    });
    let theirs = TokenCodec::new(&AuthConfig {
        jwt_secret: "someone-else".to_string(),
        ..AuthConfig::default()
    });

    let token = theirs.mint(UserId(1), "a@x.com", 1).unwrap();
    assert_eq!(ours.verify(&token).unwrap_err().kind, ErrorKind::InvalidToken);
    assert_eq!(ours.verify("not.a.token").unwrap_err().kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_signup_starts_at_version_one() {
    let app = helpers::TestApp::new();

    let payload = app
        .state
        .auth_service
        .signup(SignupInput {
            email: "a@x.com".into(),
            password: "pw".into(),
            username: Some("a".into()),
        })
        .await
        .unwrap();

    assert_eq!(payload.user.token_version, 1);
    assert_eq!(payload.user.username, "a");

    let codec = TokenCodec::new(&app.config.auth);
    let claims = codec.verify(&payload.token).unwrap();
    assert_eq!(claims.version, 1);
    assert_eq!(claims.id, payload.user.id);
}

#[tokio::test]
async fn test_login_failures_share_one_kind() {
    let app = helpers::TestApp::new();
    app.signup("alice").await;

    let wrong_password = app
        .state
        .auth_service
        .login("alice@test.com", "not-the-password")
        .await
        .unwrap_err();
    let unknown_email = app
        .state
        .auth_service
        .login("nobody@test.com", "password123")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown_email.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong_password.message, unknown_email.message);
}

#[tokio::test]
async fn test_login_route_returns_token() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "alice@test.com",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["id"], alice.id.get());
    assert!(response.body["data"]["token"].is_string());

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "alice@test.com",
                "password": "wrong",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = helpers::TestApp::new();
    app.signup("alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "email": "ALICE@test.com",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn test_version_bump_invalidates_earlier_tokens() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;

    let ctx = app
        .state
        .auth_builder
        .for_request(Some(&format!("Bearer {}", alice.token)));
    assert_eq!(ctx.identity().await.unwrap().id, alice.id);

    // Simulates a password change directly against the store.
    let user = app.store.users.find_by_id(alice.id).await.unwrap().unwrap();
    app.store
        .users
        .update_password(alice.id, &user.password_hash)
        .await
        .unwrap();

    let ctx = app
        .state
        .auth_builder
        .for_request(Some(&format!("Bearer {}", alice.token)));
    assert!(ctx.claims().is_some());
    assert!(ctx.identity().await.is_none());

    let refused = app
        .state
        .auth_builder
        .for_connection(&ConnectionParams {
            jwt: Some(alice.token.clone()),
        })
        .await
        .unwrap_err();
    assert_eq!(refused.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_password_change_rotates_token() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;

    let response = app
        .request(
            "PUT",
            "/api/auth/password",
            Some(serde_json::json!({
                "current_password": "password123",
                "new_password": "better-password",
            })),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let fresh = response.body["data"]["token"].as_str().unwrap().to_string();

    let stale = app.request("GET", "/api/users/me", None, Some(&alice.token)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let current = app.request("GET", "/api/users/me", None, Some(&fresh)).await;
    assert_eq!(current.status, StatusCode::OK);
    assert_eq!(current.body["data"]["email"], alice.email);

    let login = app
        .state
        .auth_service
        .login(&alice.email, "better-password")
        .await
        .unwrap();
    assert_eq!(login.user.token_version, 2);
}

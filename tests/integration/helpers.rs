//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use chatty_api::{AppState, build_app, build_state, serve};
use chatty_core::config::AppConfig;
use chatty_core::types::{GroupId, UserId};
use chatty_store::{MemoryStore, UserRepository};

/// Secret every test app signs tokens with.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired application state
    pub state: AppState,
    /// Backing store for direct setup and inspection
    pub store: MemoryStore,
    /// Application config
    pub config: AppConfig,
}

/// Response captured from the router
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// An identity created through the signup route
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config = AppConfig::from_toml(&format!(
            r#"
            [auth]
            jwt_secret = "{TEST_SECRET}"

            [realtime]
            connection_init_timeout_seconds = 2
            "#
        ))
        .expect("Failed to parse test config");
        Self::with_config(config)
    }

    /// Create a test application over the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let state = build_state(
            config.clone(),
            store.users.clone(),
            store.groups.clone(),
            store.messages.clone(),
        );
        let router = build_app(state.clone());

        Self {
            router,
            state,
            store,
            config,
        }
    }

    /// Serve the application on an ephemeral local port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let state = self.state.clone();
        tokio::spawn(async move {
            let _ = serve(state, listener, std::future::pending::<()>()).await;
        });
        addr
    }

    /// Sign up and return the new identity with its token
    pub async fn signup(&self, name: &str) -> TestUser {
        let email = format!("{name}@test.com");
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({
                    "email": email,
                    "password": "password123",
                    "username": name,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Signup failed: {:?}",
            response.body
        );

        let data = &response.body["data"];
        TestUser {
            id: UserId(data["user"]["id"].as_i64().expect("No user id")),
            email,
            token: data["token"]
                .as_str()
                .expect("No token in signup response")
                .to_string(),
        }
    }

    /// Make two identities friends
    pub async fn befriend(&self, a: &TestUser, b: &TestUser) {
        self.store
            .users
            .add_friendship(a.id, b.id)
            .await
            .expect("Failed to add friendship");
    }

    /// Create a group as `owner` with the given friends
    pub async fn create_group(&self, owner: &TestUser, name: &str, members: &[&TestUser]) -> GroupId {
        let user_ids: Vec<i64> = members.iter().map(|m| m.id.get()).collect();
        let response = self
            .request(
                "POST",
                "/api/groups",
                Some(serde_json::json!({ "name": name, "user_ids": user_ids })),
                Some(&owner.token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Group creation failed: {:?}",
            response.body
        );
        GroupId(response.body["data"]["id"].as_i64().expect("No group id"))
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

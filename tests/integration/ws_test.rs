//! Integration tests for the streaming endpoint over a real socket.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use chatty_core::config::AppConfig;
use chatty_core::events::Topic;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> WsStream {
    let (ws, _) = connect_async(format!("ws://{addr}/api/ws"))
        .await
        .expect("Failed to connect");
    ws
}

async fn send(ws: &mut WsStream, frame: Value) {
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Next message of any kind, failing the test after three seconds of silence.
async fn next(ws: &mut WsStream) -> Message {
    tokio::time::timeout(Duration::from_secs(3), ws.next())
        .await
        .expect("Timed out waiting for a frame")
        .expect("Socket ended")
        .expect("Socket error")
}

async fn next_json(ws: &mut WsStream) -> Value {
    match next(ws).await {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("Frame is not JSON"),
        other => panic!("Expected a text frame, got {other:?}"),
    }
}

async fn expect_close(ws: &mut WsStream, code: u16) {
    match next(ws).await {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), code),
        other => panic!("Expected close {code}, got {other:?}"),
    }
}

async fn init(ws: &mut WsStream, token: &str) {
    send(ws, json!({ "type": "connection_init", "payload": { "jwt": token } })).await;
    assert_eq!(next_json(ws).await["type"], "connection_ack");
}

async fn wait_for_subscribers(app: &helpers::TestApp, topic: Topic, expected: usize) {
    for _ in 0..100 {
        if app.state.bus.subscriber_count(topic) == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Expected {expected} subscribers on {topic}");
}

#[tokio::test]
async fn test_connection_init_is_acknowledged() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    init(&mut ws, &alice.token).await;

    send(&mut ws, json!({ "type": "ping" })).await;
    assert_eq!(next_json(&mut ws).await["type"], "pong");
    assert_eq!(app.state.connections.connection_count(), 1);
}

#[tokio::test]
async fn test_missing_or_invalid_token_closes_socket() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    send(&mut ws, json!({ "type": "connection_init", "payload": {} })).await;
    expect_close(&mut ws, 4403).await;

    let mut ws = connect(addr).await;
    send(
        &mut ws,
        json!({ "type": "connection_init", "payload": { "jwt": "forged" } }),
    )
    .await;
    expect_close(&mut ws, 4403).await;

    let mut ws = connect(addr).await;
    send(&mut ws, json!({ "type": "ping" })).await;
    expect_close(&mut ws, 4403).await;

    assert_eq!(app.state.connections.connection_count(), 0);
}

#[tokio::test]
async fn test_silent_client_times_out() {
    let mut config = AppConfig::from_toml(&format!(
        "[auth]\njwt_secret = \"{}\"",
        helpers::TEST_SECRET
    ))
    .unwrap();
    config.realtime.connection_init_timeout_seconds = 1;
    let app = helpers::TestApp::with_config(config);
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    expect_close(&mut ws, 4408).await;
}

#[tokio::test]
async fn test_subscribe_delivers_group_messages() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    app.befriend(&alice, &bob).await;
    let group = app.create_group(&alice, "pair", &[&bob]).await;
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    init(&mut ws, &bob.token).await;
    send(
        &mut ws,
        json!({
            "type": "subscribe",
            "id": "messages",
            "payload": { "topic": "message_created", "group_ids": [group.get()] },
        }),
    )
    .await;
    wait_for_subscribers(&app, Topic::MessageCreated, 1).await;

    let posted = app
        .request(
            "POST",
            &format!("/api/groups/{}/messages", group.get()),
            Some(json!({ "text": "hello bob" })),
            Some(&alice.token),
        )
        .await;
    assert_eq!(posted.status, http::StatusCode::CREATED);

    let frame = next_json(&mut ws).await;
    assert_eq!(frame["type"], "next");
    assert_eq!(frame["id"], "messages");
    assert_eq!(frame["payload"]["topic"], "message_created");
    assert_eq!(frame["payload"]["payload"]["text"], "hello bob");
    assert_eq!(frame["payload"]["payload"]["author_id"], alice.id.get());

    send(&mut ws, json!({ "type": "complete", "id": "messages" })).await;
    wait_for_subscribers(&app, Topic::MessageCreated, 0).await;
}

#[tokio::test]
async fn test_unauthorized_subscribe_gets_error_frame() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let carol = app.signup("carol").await;
    let group = app.create_group(&alice, "private", &[]).await;
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    init(&mut ws, &carol.token).await;
    send(
        &mut ws,
        json!({
            "type": "subscribe",
            "id": "snoop",
            "payload": { "topic": "message_created", "group_ids": [group.get()] },
        }),
    )
    .await;

    let frame = next_json(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["id"], "snoop");
    assert_eq!(frame["message"], "Unauthorized");
    assert_eq!(app.state.bus.subscriber_count(Topic::MessageCreated), 0);

    send(
        &mut ws,
        json!({
            "type": "subscribe",
            "id": "groups",
            "payload": { "topic": "group_created", "user_id": alice.id.get() },
        }),
    )
    .await;
    let frame = next_json(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["id"], "groups");
}

#[tokio::test]
async fn test_closing_socket_releases_subscriptions() {
    let app = helpers::TestApp::new();
    let alice = app.signup("alice").await;
    let addr = app.spawn().await;

    let mut ws = connect(addr).await;
    init(&mut ws, &alice.token).await;
    send(
        &mut ws,
        json!({
            "type": "subscribe",
            "id": "groups",
            "payload": { "topic": "group_created", "user_id": alice.id.get() },
        }),
    )
    .await;
    wait_for_subscribers(&app, Topic::GroupCreated, 1).await;

    ws.close(None).await.expect("Failed to close");
    wait_for_subscribers(&app, Topic::GroupCreated, 0).await;

    for _ in 0..100 {
        if app.state.connections.connection_count() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Connection was never unregistered");
}

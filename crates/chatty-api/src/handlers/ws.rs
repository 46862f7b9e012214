//! WebSocket upgrade handler.
//!
//! The first frame must be `connection_init` carrying a bearer token, sent
//! within the configured timeout. A connection that fails this is closed
//! immediately with a 44xx close code.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Close code sent when authentication fails.
const CLOSE_FORBIDDEN: u16 = 4403;
/// Close code sent when `connection_init` does not arrive in time.
const CLOSE_INIT_TIMEOUT: u16 = 4408;

/// GET /api/ws
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an upgraded WebSocket from authentication to teardown.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // ── Step 1: Authenticate from the first frame ────────────────
    let timeout = state.config.realtime.init_timeout();
    let first = match tokio::time::timeout(timeout, next_text(&mut ws_rx)).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("WebSocket closed before connection_init");
            return;
        }
        Err(_) => {
            warn!("WebSocket connection_init timed out");
            close(&mut ws_tx, CLOSE_INIT_TIMEOUT, "Connection initialisation timeout").await;
            return;
        }
    };

    let ctx = match state.ws_authenticator.authenticate(&first).await {
        Ok(ctx) => ctx,
        Err(_) => {
            close(&mut ws_tx, CLOSE_FORBIDDEN, "Forbidden").await;
            return;
        }
    };

    // ── Step 2: Register and start the outbound forwarder ────────
    let (handle, mut outbound_rx) = match state.connections.register(ctx).await {
        Ok(registered) => registered,
        Err(_) => {
            close(&mut ws_tx, CLOSE_FORBIDDEN, "Forbidden").await;
            return;
        }
    };
    let conn_id = handle.id;

    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(msg.to_json().into())).await.is_err() {
                break;
            }
        }
    });

    // ── Step 3: Process inbound frames until the socket closes ───
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state
                    .connections
                    .handle_inbound(&handle, text.as_str())
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // ── Step 4: Cleanup ──────────────────────────────────────────
    state.connections.unregister(&conn_id);
    outbound_task.abort();

    info!(conn_id = %conn_id, user_id = %handle.user_id, "WebSocket connection closed");
}

/// Waits for the next text frame, skipping control and binary frames.
async fn next_text(ws_rx: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => return Some(text.to_string()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => {}
        }
    }
    None
}

async fn close(ws_tx: &mut SplitSink<WebSocket, Message>, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    let _ = ws_tx.send(Message::Close(Some(frame))).await;
}

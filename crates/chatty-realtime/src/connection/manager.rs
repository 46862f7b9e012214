//! Connection manager: registration, inbound frame routing, teardown.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chatty_auth::AuthContext;
use chatty_core::config::RealtimeConfig;
use chatty_core::result::AppResult;

use crate::filter::SubscriptionAuthorizer;
use crate::protocol::{InboundMessage, OutboundMessage, SubscribePayload};

use super::handle::{ConnectionHandle, ConnectionId};

/// Manages all active streaming connections.
pub struct ConnectionManager {
    /// Live connections.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Subscription authorization filter.
    authorizer: SubscriptionAuthorizer,
    /// Configuration.
    config: RealtimeConfig,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig, authorizer: SubscriptionAuthorizer) -> Self {
        Self {
            connections: DashMap::new(),
            authorizer,
            config,
        }
    }

    /// Registers an authenticated connection and acknowledges it.
    ///
    /// Returns the connection handle and a receiver for outbound frames.
    pub async fn register(
        &self,
        ctx: AuthContext,
    ) -> AppResult<(Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>)> {
        let user = ctx.require_identity().await?;
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));

        let handle = Arc::new(ConnectionHandle::new(user.id, ctx, tx));
        self.connections.insert(handle.id, handle.clone());
        handle.send(OutboundMessage::ConnectionAck);

        info!(conn_id = %handle.id, user_id = %user.id, "Streaming connection registered");
        Ok((handle, rx))
    }

    /// Unregisters a connection and cancels all of its operations.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some((_, handle)) = self.connections.remove(conn_id) {
            handle.mark_closed();
            let cancelled = handle.cancel_all();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                cancelled,
                "Streaming connection unregistered"
            );
        }
    }

    /// Processes one inbound text frame.
    pub async fn handle_inbound(&self, handle: &ConnectionHandle, raw_message: &str) {
        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                handle.send(OutboundMessage::protocol_error(format!(
                    "Failed to parse message: {e}"
                )));
                return;
            }
        };

        match msg {
            InboundMessage::ConnectionInit { .. } => {
                handle.send(OutboundMessage::protocol_error(
                    "Connection is already initialised",
                ));
            }
            InboundMessage::Subscribe { id, payload } => {
                self.handle_subscribe(handle, id, payload).await;
            }
            InboundMessage::Complete { id } => {
                if !handle.cancel_operation(&id) {
                    debug!(conn_id = %handle.id, op_id = %id, "Complete for unknown operation");
                }
            }
            InboundMessage::Ping => {
                handle.send(OutboundMessage::Pong);
            }
        }
    }

    /// Establishes a subscription with limit and authorization checks.
    async fn handle_subscribe(&self, handle: &ConnectionHandle, op_id: String, payload: SubscribePayload) {
        if handle.has_operation(&op_id) {
            handle.send(OutboundMessage::error(
                op_id,
                "Operation id is already in use",
            ));
            return;
        }

        let max = self.config.max_subscriptions_per_connection;
        if handle.operation_count() >= max {
            handle.send(OutboundMessage::error(
                op_id,
                format!("Maximum subscriptions ({max}) reached"),
            ));
            return;
        }

        let established = match &payload {
            SubscribePayload::MessageCreated { group_ids } => {
                self.authorizer.message_created(&handle.ctx, group_ids).await
            }
            SubscribePayload::GroupCreated { user_id } => {
                self.authorizer.group_created(&handle.ctx, *user_id).await
            }
        };

        match established {
            Ok(subscription) => {
                if !handle.start_operation(op_id.clone(), subscription) {
                    handle.send(OutboundMessage::error(
                        op_id,
                        "Operation id is already in use",
                    ));
                    return;
                }
                debug!(conn_id = %handle.id, op_id = %op_id, "Operation started");
            }
            Err(e) => {
                warn!(
                    conn_id = %handle.id,
                    user_id = %handle.user_id,
                    op_id = %op_id,
                    error = %e,
                    "Subscription refused"
                );
                handle.send(OutboundMessage::error(op_id, e.message));
            }
        }
    }

    /// Returns a live connection.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections.get(conn_id).map(|h| h.clone())
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

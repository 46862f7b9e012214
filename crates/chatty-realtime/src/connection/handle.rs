//! Individual streaming connection handle.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use chatty_auth::AuthContext;
use chatty_core::events::ChatEvent;
use chatty_core::types::UserId;

use crate::bus::{Registration, Subscription};
use crate::protocol::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// One active subscription operation.
struct Operation {
    registration: Registration<ChatEvent>,
    task: JoinHandle<()>,
}

impl Operation {
    fn stop(self) {
        self.registration.release();
        self.task.abort();
    }
}

/// A handle to a single authenticated streaming connection.
///
/// Holds the outbound frame queue, the connection's authentication
/// context, and one forwarding task per active operation.
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Identity fixed at connection time.
    pub user_id: UserId,
    /// Authentication context shared by every operation on this connection.
    pub ctx: AuthContext,
    /// Sender for outbound frames.
    sender: mpsc::Sender<OutboundMessage>,
    /// Operation id → active operation.
    operations: Mutex<HashMap<String, Operation>>,
    /// Whether the connection is still open.
    alive: AtomicBool,
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("operations", &self.operation_count())
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(user_id: UserId, ctx: AuthContext, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            ctx,
            sender,
            operations: Mutex::new(HashMap::new()),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an outbound frame without waiting.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Outbound buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Whether an operation with this id is active.
    pub fn has_operation(&self, op_id: &str) -> bool {
        self.lock_operations().contains_key(op_id)
    }

    /// Number of active operations.
    pub fn operation_count(&self) -> usize {
        self.lock_operations().len()
    }

    /// Starts forwarding a subscription's events as `next` frames.
    ///
    /// Returns `false`, dropping the subscription, if `op_id` is taken.
    pub fn start_operation(&self, op_id: String, mut subscription: Subscription<ChatEvent>) -> bool {
        let mut operations = self.lock_operations();
        if operations.contains_key(&op_id) {
            return false;
        }

        let registration = subscription.registration();
        let sender = self.sender.clone();
        let id = op_id.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                let frame = OutboundMessage::Next {
                    id: id.clone(),
                    payload: event,
                };
                if sender.send(frame).await.is_err() {
                    return;
                }
            }
            let _ = sender.send(OutboundMessage::Complete { id }).await;
        });

        operations.insert(op_id, Operation { registration, task });
        true
    }

    /// Stops one operation and releases its bus registration.
    pub fn cancel_operation(&self, op_id: &str) -> bool {
        match self.lock_operations().remove(op_id) {
            Some(operation) => {
                operation.stop();
                debug!(conn_id = %self.id, op_id, "Operation cancelled");
                true
            }
            None => false,
        }
    }

    /// Stops every operation. Returns how many were active.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.lock_operations().drain().collect();
        let count = drained.len();
        for (_, operation) in drained {
            operation.stop();
        }
        count
    }

    /// Check if connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    fn lock_operations(&self) -> std::sync::MutexGuard<'_, HashMap<String, Operation>> {
        // A poisoned map is still structurally valid.
        self.operations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

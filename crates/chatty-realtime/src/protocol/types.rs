//! Inbound and outbound frame definitions. Every frame is a JSON text
//! message tagged by `type`.

use serde::{Deserialize, Serialize};

use chatty_auth::ConnectionParams;
use chatty_core::events::ChatEvent;
use chatty_core::types::{GroupId, UserId};

/// Frames sent by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Must be the first frame. Carries the bearer token.
    ConnectionInit {
        #[serde(default)]
        payload: ConnectionParams,
    },
    /// Start an operation.
    Subscribe {
        /// Client-chosen operation id, unique among active operations.
        id: String,
        payload: SubscribePayload,
    },
    /// Stop an operation.
    Complete { id: String },
    /// Keep-alive.
    Ping,
}

/// What a `subscribe` frame asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum SubscribePayload {
    /// New messages in the listed groups.
    MessageCreated { group_ids: Vec<GroupId> },
    /// New groups that include `user_id`.
    GroupCreated { user_id: UserId },
}

/// Frames sent by the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// The connection is authenticated.
    ConnectionAck,
    /// An event for an active operation.
    Next { id: String, payload: ChatEvent },
    /// An operation failed, or a frame could not be understood.
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        message: String,
    },
    /// An operation finished.
    Complete { id: String },
    /// Keep-alive reply.
    Pong,
}

impl OutboundMessage {
    /// Error frame for an operation.
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            id: Some(id.into()),
            message: message.into(),
        }
    }

    /// Error frame not tied to an operation.
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::Error {
            id: None,
            message: message.into(),
        }
    }

    /// Serializes the frame to JSON text.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

//! Streaming connection and event bus configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-subscriber delivery queue size. Events beyond it are dropped.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum active subscriptions per connection.
    #[serde(default = "default_max_subscriptions")]
    pub max_subscriptions_per_connection: usize,
    /// Seconds a client has to send `connection_init` after the upgrade.
    #[serde(default = "default_init_timeout")]
    pub connection_init_timeout_seconds: u64,
}

impl RealtimeConfig {
    /// Time allowed between the upgrade and `connection_init`.
    pub fn init_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_init_timeout_seconds)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            max_subscriptions_per_connection: default_max_subscriptions(),
            connection_init_timeout_seconds: default_init_timeout(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_subscriptions() -> usize {
    50
}

fn default_init_timeout() -> u64 {
    10
}

//! In-memory repositories for single-process deployments and tests.

pub mod group;
pub mod message;
pub mod user;

use std::sync::Arc;

pub use group::MemoryGroupRepository;
pub use message::MemoryMessageRepository;
pub use user::MemoryUserRepository;

/// Bundles one in-memory repository per entity.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Identities and friendships.
    pub users: Arc<MemoryUserRepository>,
    /// Groups and memberships.
    pub groups: Arc<MemoryGroupRepository>,
    /// Messages.
    pub messages: Arc<MemoryMessageRepository>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

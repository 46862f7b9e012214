//! Fixtures shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use chatty_auth::{AuthContext, AuthContextBuilder, TokenCodec};
use chatty_core::config::AuthConfig;
use chatty_core::events::ChatEvent;
use chatty_core::traits::EventPublisher;
use chatty_entity::user::{NewUser, User};
use chatty_store::memory::MemoryStore;
use chatty_store::repository::UserRepository;

/// Publisher that keeps every event in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<ChatEvent>>,
}

impl RecordingPublisher {
    pub fn taken(&self) -> Vec<ChatEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: ChatEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct Fixture {
    pub store: MemoryStore,
    pub codec: Arc<TokenCodec>,
    pub builder: AuthContextBuilder,
    pub publisher: Arc<RecordingPublisher>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let codec = Arc::new(TokenCodec::new(&AuthConfig::default()));
        let builder = AuthContextBuilder::new(codec.clone(), store.users.clone());
        Self {
            store,
            codec,
            builder,
            publisher: Arc::new(RecordingPublisher::default()),
        }
    }

    pub async fn user(&self, name: &str) -> User {
        self.store
            .users
            .create(NewUser {
                email: format!("{name}@x.com"),
                username: name.to_string(),
                password_hash: "unused".into(),
            })
            .await
            .unwrap()
    }

    pub fn ctx(&self, user: &User) -> AuthContext {
        let token = self.codec.mint_for(user).unwrap();
        self.builder.for_request(Some(&format!("Bearer {token}")))
    }

    pub async fn befriend(&self, a: &User, b: &User) {
        self.store.users.add_friendship(a.id, b.id).await.unwrap();
    }
}

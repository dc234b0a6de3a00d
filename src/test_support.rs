//! Shared fixtures for unit tests.

use crate::access::AccessGate;
use crate::config::MessagingConfig;
use crate::conversation::{
    adapters::memory::InMemoryConversationRepository, services::ConversationStore,
};
use crate::identity::{
    adapters::memory::InMemoryIdentityRegistry,
    domain::{DisplayName, User, UserId},
    ports::IdentityRegistry,
};
use crate::message::{adapters::memory::InMemoryMessageRepository, services::MessageStore};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that advances one second on every reading.
///
/// Gives every stamped entity a distinct, strictly increasing timestamp so
/// ordering assertions do not depend on wall-clock resolution.
#[derive(Debug)]
pub struct SteppingClock {
    next_secs: AtomicI64,
}

impl SteppingClock {
    pub const START_SECS: i64 = 1_767_225_600;

    pub const fn new() -> Self {
        Self {
            next_secs: AtomicI64::new(Self::START_SECS),
        }
    }

    fn tick(&self) -> DateTime<Utc> {
        let secs = self.next_secs.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.tick().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.tick()
    }
}

/// Conversation store over in-memory adapters.
pub type TestConversationStore =
    ConversationStore<InMemoryConversationRepository, InMemoryIdentityRegistry, SteppingClock>;

/// Message store over in-memory adapters.
pub type TestMessageStore = MessageStore<
    InMemoryMessageRepository,
    InMemoryConversationRepository,
    InMemoryIdentityRegistry,
    SteppingClock,
>;

/// Access gate over in-memory adapters.
pub type TestGate = AccessGate<
    InMemoryMessageRepository,
    InMemoryConversationRepository,
    InMemoryIdentityRegistry,
    SteppingClock,
>;

/// Fully wired in-memory messaging core.
pub struct Harness {
    pub identities: Arc<InMemoryIdentityRegistry>,
    pub conversation_repository: Arc<InMemoryConversationRepository>,
    pub message_repository: Arc<InMemoryMessageRepository>,
    pub gate: TestGate,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(MessagingConfig::default())
    }

    pub fn with_config(config: MessagingConfig) -> Self {
        let identities = Arc::new(InMemoryIdentityRegistry::new());
        let conversation_repository = Arc::new(InMemoryConversationRepository::new());
        let message_repository = Arc::new(InMemoryMessageRepository::new());
        let gate = AccessGate::assemble(
            Arc::clone(&message_repository),
            Arc::clone(&conversation_repository),
            Arc::clone(&identities),
            Arc::new(SteppingClock::new()),
            config,
        );
        Self {
            identities,
            conversation_repository,
            message_repository,
            gate,
        }
    }

    pub const fn conversations(&self) -> &TestConversationStore {
        self.gate.conversations()
    }

    pub const fn messages(&self) -> &TestMessageStore {
        self.gate.messages()
    }

    /// Registers an active user.
    pub fn user(&self, name: &str) -> UserId {
        self.register(User::new(display_name(name), &DefaultClock))
    }

    /// Registers a user the identity subsystem has already disabled.
    pub fn disabled_user(&self, name: &str) -> UserId {
        self.register(User::new(display_name(name), &DefaultClock).disabled())
    }

    /// Disables a registered user in place.
    pub async fn disable(&self, id: UserId) {
        let user = self
            .identities
            .lookup(id)
            .await
            .expect("user is registered");
        self.register(user.disabled());
    }

    fn register(&self, user: User) -> UserId {
        self.identities
            .register(user)
            .expect("registry accepts user")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(name: &str) -> DisplayName {
    DisplayName::new(name).expect("valid display name")
}

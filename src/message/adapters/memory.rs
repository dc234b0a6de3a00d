//! In-memory implementation of the `MessageRepository` port.
//!
//! Messages are indexed by conversation so that per-conversation queries do
//! not scan the whole store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::conversation::domain::ConversationId;
use crate::message::{
    domain::{Message, MessageId},
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};

/// Thread-safe in-memory message repository.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageRepository {
    state: Arc<RwLock<InMemoryMessageState>>,
}

#[derive(Debug, Default)]
struct InMemoryMessageState {
    messages: HashMap<MessageId, Message>,
    conversation_index: HashMap<ConversationId, Vec<MessageId>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages, deleted ones included.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|guard| guard.messages.len()).unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> MessageRepositoryResult<RwLockReadGuard<'_, InMemoryMessageState>> {
        self.state.read().map_err(|err| {
            MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> MessageRepositoryResult<RwLockWriteGuard<'_, InMemoryMessageState>> {
        self.state.write().map_err(|err| {
            MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()> {
        let mut state = self.write()?;
        if state.messages.contains_key(&message.id()) {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        state
            .conversation_index
            .entry(message.conversation_id())
            .or_default()
            .push(message.id());
        state.messages.insert(message.id(), message.clone());
        Ok(())
    }

    async fn update(&self, message: &Message) -> MessageRepositoryResult<()> {
        self.update_many(std::slice::from_ref(message)).await
    }

    async fn update_many(&self, messages: &[Message]) -> MessageRepositoryResult<()> {
        let mut state = self.write()?;
        if let Some(missing) = messages
            .iter()
            .find(|message| !state.messages.contains_key(&message.id()))
        {
            return Err(MessageRepositoryError::NotFound(missing.id()));
        }
        for message in messages {
            state.messages.insert(message.id(), message.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<Message>> {
        Ok(self.read()?.messages.get(&id).cloned())
    }

    async fn find_by_conversations(
        &self,
        conversation_ids: &[ConversationId],
    ) -> MessageRepositoryResult<Vec<Message>> {
        let state = self.read()?;
        Ok(conversation_ids
            .iter()
            .filter_map(|conversation_id| state.conversation_index.get(conversation_id))
            .flatten()
            .filter_map(|id| state.messages.get(id).cloned())
            .collect())
    }
}

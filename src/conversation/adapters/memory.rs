//! In-memory conversation repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::conversation::{
    domain::{Conversation, ConversationId},
    ports::{ConversationRepository, ConversationRepositoryError, ConversationRepositoryResult},
};
use crate::identity::domain::UserId;

/// Thread-safe in-memory conversation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationRepository {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored conversations.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no conversations are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(
        &self,
    ) -> ConversationRepositoryResult<RwLockReadGuard<'_, HashMap<ConversationId, Conversation>>>
    {
        self.conversations.read().map_err(|err| {
            ConversationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> ConversationRepositoryResult<RwLockWriteGuard<'_, HashMap<ConversationId, Conversation>>>
    {
        self.conversations.write().map_err(|err| {
            ConversationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn store(&self, conversation: &Conversation) -> ConversationRepositoryResult<()> {
        let mut guard = self.write()?;
        if guard.contains_key(&conversation.id()) {
            return Err(ConversationRepositoryError::DuplicateConversation(
                conversation.id(),
            ));
        }
        guard.insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn update(&self, conversation: &Conversation) -> ConversationRepositoryResult<()> {
        let mut guard = self.write()?;
        let stored = guard
            .get_mut(&conversation.id())
            .ok_or(ConversationRepositoryError::NotFound(conversation.id()))?;
        *stored = conversation.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> ConversationRepositoryResult<Option<Conversation>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_by_participant(
        &self,
        user: UserId,
    ) -> ConversationRepositoryResult<Vec<Conversation>> {
        let guard = self.read()?;
        Ok(guard
            .values()
            .filter(|conversation| conversation.is_participant(user))
            .cloned()
            .collect())
    }

    async fn record_activity(
        &self,
        id: ConversationId,
        timestamp: DateTime<Utc>,
    ) -> ConversationRepositoryResult<DateTime<Utc>> {
        let mut guard = self.write()?;
        let conversation = guard
            .get_mut(&id)
            .ok_or(ConversationRepositoryError::NotFound(id))?;
        Ok(conversation.record_activity(timestamp))
    }
}

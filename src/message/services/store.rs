//! Message store: append, read state, edits and soft deletion.

use crate::config::MessagingConfig;
use crate::conversation::{
    domain::{Conversation, ConversationId},
    ports::ConversationRepository,
    services::{ConversationStore, ConversationStoreError, LockError},
};
use crate::deadline::Deadline;
use crate::error::ErrorCategory;
use crate::identity::{domain::UserId, ports::IdentityRegistry};
use crate::message::{
    domain::{
        Message, MessageBody, MessageDomainError, MessageFilter, MessageId, Page, PageRequest,
        newest_first,
    },
    ports::{MessageRepository, MessageRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Service-level errors for message operations.
#[derive(Debug, Error)]
pub enum MessageStoreError {
    /// The message does not exist.
    #[error("message not found")]
    NotFound(MessageId),

    /// The owning conversation does not exist.
    #[error("conversation not found")]
    ConversationNotFound(ConversationId),

    /// The user is not a current participant of the conversation.
    #[error("not a participant of this conversation")]
    NotParticipant {
        /// Conversation that was addressed.
        conversation_id: ConversationId,
        /// User that is not a member.
        user_id: UserId,
    },

    /// The conversation no longer accepts messages.
    #[error("conversation is inactive")]
    ConversationInactive(ConversationId),

    /// A message rule was violated.
    #[error(transparent)]
    Domain(#[from] MessageDomainError),

    /// The conversation lock could not be acquired in time.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// A conversation store operation failed.
    #[error(transparent)]
    Conversation(ConversationStoreError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(MessageRepositoryError),

    /// A broken invariant aborted the operation. Never caused by the caller.
    #[error(transparent)]
    Internal(ConversationStoreError),
}

impl MessageStoreError {
    /// Returns the transport-neutral category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) | Self::ConversationNotFound(_) => ErrorCategory::NotFound,
            Self::NotParticipant { .. }
            | Self::Domain(MessageDomainError::NotAuthor | MessageDomainError::SelfReadForbidden) => {
                ErrorCategory::Forbidden
            }
            Self::ConversationInactive(_) | Self::Domain(MessageDomainError::MessageDeleted) => {
                ErrorCategory::InvariantViolation
            }
            Self::Domain(MessageDomainError::EmptyBody | MessageDomainError::BodyTooLong { .. }) => {
                ErrorCategory::InvalidInput
            }
            Self::Lock(_) => ErrorCategory::Unavailable,
            Self::Conversation(err) => err.category(),
            Self::Repository(err) => err.category(),
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl From<ConversationStoreError> for MessageStoreError {
    fn from(err: ConversationStoreError) -> Self {
        match err {
            ConversationStoreError::NotFound(id) => Self::ConversationNotFound(id),
            ConversationStoreError::Lock(lock) => Self::Lock(lock),
            internal @ (ConversationStoreError::ActivityNotRecorded { .. }
            | ConversationStoreError::GuardMismatch { .. }) => Self::Internal(internal),
            other => Self::Conversation(other),
        }
    }
}

impl From<MessageRepositoryError> for MessageStoreError {
    fn from(err: MessageRepositoryError) -> Self {
        match err {
            MessageRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for message store operations.
pub type MessageStoreResult<T> = Result<T, MessageStoreError>;

/// Owns message records and keeps conversation activity in step with them.
pub struct MessageStore<M, R, I, C>
where
    M: MessageRepository,
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    repository: Arc<M>,
    conversations: ConversationStore<R, I, C>,
    clock: Arc<C>,
    config: MessagingConfig,
}

impl<M, R, I, C> Clone for MessageStore<M, R, I, C>
where
    M: MessageRepository,
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            conversations: self.conversations.clone(),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<M, R, I, C> MessageStore<M, R, I, C>
where
    M: MessageRepository,
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a message store on top of a conversation store.
    #[must_use]
    pub const fn new(
        repository: Arc<M>,
        conversations: ConversationStore<R, I, C>,
        clock: Arc<C>,
        config: MessagingConfig,
    ) -> Self {
        Self {
            repository,
            conversations,
            clock,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &MessagingConfig {
        &self.config
    }

    /// Appends a message and advances the conversation's activity marker.
    ///
    /// Validation, the marker update and the insert run as one unit under
    /// the conversation lock. Nothing is persisted unless every step
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::EmptyBody`] or
    /// [`MessageDomainError::BodyTooLong`] for an invalid body,
    /// [`MessageStoreError::ConversationNotFound`],
    /// [`MessageStoreError::NotParticipant`],
    /// [`MessageStoreError::ConversationInactive`], a lock error,
    /// [`MessageStoreError::Internal`] when the marker cannot be updated, or a
    /// repository error.
    pub async fn append(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        body: impl Into<String> + Send,
        deadline: Deadline,
    ) -> MessageStoreResult<Message> {
        let body = MessageBody::new(body, self.config.max_body_chars)?;
        self.conversations.get(conversation_id).await?;

        let guard = self
            .conversations
            .locks()
            .acquire(conversation_id, deadline)
            .await?;
        let snapshot = self.conversations.get_locked(&guard).await?;
        ensure_participant(&snapshot, sender_id)?;
        if !snapshot.is_active() {
            return Err(MessageStoreError::ConversationInactive(conversation_id));
        }

        let message = Message::new(conversation_id, sender_id, body, &*self.clock);
        self.conversations
            .record_activity(&guard, message.sent_at())
            .await?;

        if let Err(err) = self.repository.store(&message).await {
            warn!(conversation_id = %conversation_id, error = %err, "message insert failed; restoring activity marker");
            if let Err(restore_err) = self.conversations.restore(&guard, &snapshot).await {
                error!(conversation_id = %conversation_id, error = %restore_err, "activity marker restore failed");
            }
            return Err(err.into());
        }

        debug!(
            conversation_id = %conversation_id,
            message_id = %message.id(),
            sender_id = %sender_id,
            "message appended"
        );
        Ok(message)
    }

    /// Marks one message read on behalf of `reader_id`.
    ///
    /// Marking an already read message succeeds unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::NotFound`],
    /// [`MessageDomainError::SelfReadForbidden`] when the reader sent the
    /// message, [`MessageStoreError::NotParticipant`],
    /// [`MessageDomainError::MessageDeleted`], a lock error, or a repository
    /// error.
    pub async fn mark_read(
        &self,
        message_id: MessageId,
        reader_id: UserId,
        deadline: Deadline,
    ) -> MessageStoreResult<Message> {
        let conversation_id = self.get(message_id).await?.conversation_id();
        let guard = self
            .conversations
            .locks()
            .acquire(conversation_id, deadline)
            .await?;
        let conversation = self.conversations.get_locked(&guard).await?;
        let mut message = self.get(message_id).await?;

        // Domain rules run on the local copy first so a sender always gets
        // `SelfReadForbidden`, even after leaving the conversation.
        let changed = message.mark_read(reader_id)?;
        ensure_participant(&conversation, reader_id)?;
        if changed {
            self.repository.update(&message).await?;
            debug!(message_id = %message_id, reader_id = %reader_id, "message marked read");
        }
        Ok(message)
    }

    /// Marks every unread, non-deleted message not sent by `reader_id` as
    /// read and returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::ConversationNotFound`],
    /// [`MessageStoreError::NotParticipant`], a lock error, or a repository
    /// error.
    pub async fn mark_all_read(
        &self,
        conversation_id: ConversationId,
        reader_id: UserId,
        deadline: Deadline,
    ) -> MessageStoreResult<usize> {
        self.conversations.get(conversation_id).await?;
        let guard = self
            .conversations
            .locks()
            .acquire(conversation_id, deadline)
            .await?;
        let conversation = self.conversations.get_locked(&guard).await?;
        ensure_participant(&conversation, reader_id)?;

        let mut unread: Vec<Message> = self
            .repository
            .find_by_conversations(&[conversation_id])
            .await?
            .into_iter()
            .filter(|message| message.is_unread_for(reader_id))
            .collect();
        for message in &mut unread {
            message.mark_read(reader_id)?;
        }
        if !unread.is_empty() {
            self.repository.update_many(&unread).await?;
        }
        info!(conversation_id = %conversation_id, reader_id = %reader_id, count = unread.len(), "messages marked read");
        Ok(unread.len())
    }

    /// Replaces a message body and stamps `edited_at`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::NotFound`],
    /// [`MessageDomainError::NotAuthor`], [`MessageDomainError::EmptyBody`],
    /// [`MessageDomainError::BodyTooLong`],
    /// [`MessageDomainError::MessageDeleted`], a lock error, or a repository
    /// error.
    pub async fn edit(
        &self,
        message_id: MessageId,
        editor_id: UserId,
        new_body: impl Into<String> + Send,
        deadline: Deadline,
    ) -> MessageStoreResult<Message> {
        let conversation_id = self.get(message_id).await?.conversation_id();
        let guard = self
            .conversations
            .locks()
            .acquire(conversation_id, deadline)
            .await?;
        let mut message = self.get(message_id).await?;
        if message.sender_id() != editor_id {
            return Err(MessageDomainError::NotAuthor.into());
        }

        let body = MessageBody::new(new_body, self.config.max_body_chars)?;
        message.edit(editor_id, body, &*self.clock)?;
        self.repository.update(&message).await?;
        debug!(message_id = %message_id, conversation_id = %guard.conversation_id(), "message edited");
        Ok(message)
    }

    /// Soft-deletes a message. Deleting twice succeeds unchanged.
    ///
    /// The conversation's activity marker is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::NotFound`],
    /// [`MessageDomainError::NotAuthor`], a lock error, or a repository error.
    pub async fn soft_delete(
        &self,
        message_id: MessageId,
        requester_id: UserId,
        deadline: Deadline,
    ) -> MessageStoreResult<Message> {
        let conversation_id = self.get(message_id).await?.conversation_id();
        let guard = self
            .conversations
            .locks()
            .acquire(conversation_id, deadline)
            .await?;
        let mut message = self.get(message_id).await?;
        if message.soft_delete(requester_id)? {
            self.repository.update(&message).await?;
            info!(message_id = %message_id, conversation_id = %guard.conversation_id(), "message deleted");
        }
        Ok(message)
    }

    /// Returns a message by identifier, including deleted messages.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::NotFound`] or a repository error.
    pub async fn get(&self, message_id: MessageId) -> MessageStoreResult<Message> {
        self.repository
            .find_by_id(message_id)
            .await?
            .ok_or(MessageStoreError::NotFound(message_id))
    }

    /// Lists non-deleted messages of a conversation, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::ConversationNotFound`],
    /// [`MessageStoreError::NotParticipant`], or a repository error.
    pub async fn list_for_conversation(
        &self,
        conversation_id: ConversationId,
        requester_id: UserId,
        page: PageRequest,
        filter: &MessageFilter,
    ) -> MessageStoreResult<Page<Message>> {
        let conversation = self.conversations.get(conversation_id).await?;
        ensure_participant(&conversation, requester_id)?;

        let mut visible: Vec<Message> = self
            .repository
            .find_by_conversations(&[conversation_id])
            .await?
            .into_iter()
            .filter(|message| !message.is_deleted() && filter.matches(message))
            .collect();
        visible.sort_by(newest_first);
        Ok(Page::paginate(visible, page, &self.config))
    }

    /// Returns every message waiting for `user_id` across their
    /// conversations, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error when a lookup fails.
    pub async fn unread_for(&self, user_id: UserId) -> MessageStoreResult<Vec<Message>> {
        let conversation_ids: Vec<ConversationId> = self
            .conversations
            .list_for_user(user_id, false)
            .await?
            .iter()
            .map(Conversation::id)
            .collect();

        let mut unread: Vec<Message> = self
            .repository
            .find_by_conversations(&conversation_ids)
            .await?
            .into_iter()
            .filter(|message| message.is_unread_for(user_id))
            .collect();
        unread.sort_by(newest_first);
        Ok(unread)
    }

    /// Returns the newest non-deleted message of a conversation.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> MessageStoreResult<Option<Message>> {
        let messages = self
            .repository
            .find_by_conversations(&[conversation_id])
            .await?;
        Ok(messages
            .into_iter()
            .filter(|message| !message.is_deleted())
            .min_by(newest_first))
    }

    /// Counts messages in a conversation waiting for `reader_id`.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn unread_count(
        &self,
        conversation_id: ConversationId,
        reader_id: UserId,
    ) -> MessageStoreResult<usize> {
        let messages = self
            .repository
            .find_by_conversations(&[conversation_id])
            .await?;
        Ok(messages
            .iter()
            .filter(|message| message.is_unread_for(reader_id))
            .count())
    }
}

fn ensure_participant(conversation: &Conversation, user_id: UserId) -> MessageStoreResult<()> {
    if !conversation.is_participant(user_id) {
        return Err(MessageStoreError::NotParticipant {
            conversation_id: conversation.id(),
            user_id,
        });
    }
    Ok(())
}

//! Repository port for message persistence.
//!
//! Defines the storage-agnostic interface for messages. Messages are never
//! hard-deleted, so the port has no removal operation.

use crate::conversation::domain::ConversationId;
use crate::error::ErrorCategory;
use crate::message::domain::{Message, MessageId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Message persistence contract.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - message identifiers are unique across the system
/// - each call is atomic on its own; callers serialise multi-step units
/// - queries return deleted messages too; filtering is the caller's concern
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a new message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the
    /// identifier already exists.
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()>;

    /// Persists changes to an existing message (read flag, body, deletion).
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::NotFound`] when the message does not
    /// exist.
    async fn update(&self, message: &Message) -> MessageRepositoryResult<()>;

    /// Persists changes to several messages of one conversation at once.
    ///
    /// Either every message is updated or none is.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::NotFound`] when any message does not
    /// exist.
    async fn update_many(&self, messages: &[Message]) -> MessageRepositoryResult<()>;

    /// Finds a message by identifier, deleted or not.
    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<Message>>;

    /// Returns every message of the given conversations, deleted ones
    /// included, in no particular order.
    async fn find_by_conversations(
        &self,
        conversation_ids: &[ConversationId],
    ) -> MessageRepositoryResult<Vec<Message>>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier")]
    DuplicateMessage(MessageId),

    /// The message was not found.
    #[error("message not found")]
    NotFound(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns the transport-neutral category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateMessage(_) => ErrorCategory::Internal,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Persistence(_) => ErrorCategory::Unavailable,
        }
    }
}

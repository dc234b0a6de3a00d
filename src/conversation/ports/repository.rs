//! Repository port for conversation persistence and membership lookup.

use crate::conversation::domain::{Conversation, ConversationId};
use crate::error::ErrorCategory;
use crate::identity::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for conversation repository operations.
pub type ConversationRepositoryResult<T> = Result<T, ConversationRepositoryError>;

/// Conversation persistence contract.
///
/// Implementations must make each call atomic on its own; multi-step units
/// are serialised by the stores through the per-conversation lock.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Stores a new conversation.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError::DuplicateConversation`] when the
    /// identifier already exists.
    async fn store(&self, conversation: &Conversation) -> ConversationRepositoryResult<()>;

    /// Persists changes to an existing conversation (membership, activity
    /// marker, activation flag).
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError::NotFound`] when the conversation
    /// does not exist.
    async fn update(&self, conversation: &Conversation) -> ConversationRepositoryResult<()>;

    /// Finds a conversation by identifier.
    ///
    /// Returns `None` when the conversation does not exist.
    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> ConversationRepositoryResult<Option<Conversation>>;

    /// Returns every conversation the user currently participates in, in no
    /// particular order.
    async fn find_by_participant(
        &self,
        user: UserId,
    ) -> ConversationRepositoryResult<Vec<Conversation>>;

    /// Advances the activity marker to `max(current, timestamp)` and returns
    /// the resulting marker.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationRepositoryError::NotFound`] when the conversation
    /// does not exist.
    async fn record_activity(
        &self,
        id: ConversationId,
        timestamp: DateTime<Utc>,
    ) -> ConversationRepositoryResult<DateTime<Utc>>;
}

/// Errors returned by conversation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ConversationRepositoryError {
    /// A conversation with the same identifier already exists.
    #[error("duplicate conversation identifier")]
    DuplicateConversation(ConversationId),

    /// The conversation was not found.
    #[error("conversation not found")]
    NotFound(ConversationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConversationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns the transport-neutral category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateConversation(_) => ErrorCategory::Internal,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Persistence(_) => ErrorCategory::Unavailable,
        }
    }
}

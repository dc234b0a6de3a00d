//! Conversation store: creation, membership changes and activity tracking.

use super::locks::{ConversationGuard, ConversationLocks, LockError};
use crate::conversation::{
    domain::{
        Conversation, ConversationDomainError, ConversationId, ParticipantSet, activity_order,
    },
    ports::{ConversationRepository, ConversationRepositoryError},
};
use crate::deadline::Deadline;
use crate::error::ErrorCategory;
use crate::identity::{
    domain::UserId,
    ports::{IdentityError, IdentityRegistry},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Service-level errors for conversation operations.
#[derive(Debug, Error)]
pub enum ConversationStoreError {
    /// The conversation does not exist.
    #[error("conversation not found")]
    NotFound(ConversationId),

    /// A participant identifier does not resolve to an active user.
    #[error("unknown user")]
    UnknownUser(UserId),

    /// A membership rule was violated.
    #[error(transparent)]
    Domain(#[from] ConversationDomainError),

    /// The conversation lock could not be acquired in time.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// The identity registry failed.
    #[error("identity registry unavailable")]
    IdentityUnavailable(#[source] IdentityError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(ConversationRepositoryError),

    /// The activity marker of a conversation that passed validation could
    /// not be updated. Indicates corrupted state, not a caller mistake.
    #[error("internal error: conversation activity could not be recorded")]
    ActivityNotRecorded {
        /// Conversation whose marker was not updated.
        conversation_id: ConversationId,
        /// Underlying repository failure.
        #[source]
        source: ConversationRepositoryError,
    },

    /// A guarded write targeted a conversation other than the one locked.
    #[error("internal error: lock held for a different conversation")]
    GuardMismatch {
        /// Conversation whose lock is held.
        held: ConversationId,
        /// Conversation the write targeted.
        target: ConversationId,
    },
}

impl ConversationStoreError {
    /// Returns the transport-neutral category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) | Self::UnknownUser(_) => ErrorCategory::NotFound,
            Self::Domain(ConversationDomainError::InvalidParticipants { .. }) => {
                ErrorCategory::InvalidInput
            }
            Self::Domain(ConversationDomainError::InvariantViolation { .. }) => {
                ErrorCategory::InvariantViolation
            }
            Self::Lock(_) | Self::IdentityUnavailable(_) => ErrorCategory::Unavailable,
            Self::Repository(err) => err.category(),
            Self::ActivityNotRecorded { .. } | Self::GuardMismatch { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

impl From<ConversationRepositoryError> for ConversationStoreError {
    fn from(err: ConversationRepositoryError) -> Self {
        match err {
            ConversationRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<IdentityError> for ConversationStoreError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound(id) => Self::UnknownUser(id),
            unavailable @ IdentityError::Unavailable(_) => Self::IdentityUnavailable(unavailable),
        }
    }
}

/// Result type for conversation store operations.
pub type ConversationStoreResult<T> = Result<T, ConversationStoreError>;

/// Owns conversation records and participant membership.
pub struct ConversationStore<R, I, C>
where
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    identities: Arc<I>,
    clock: Arc<C>,
    locks: Arc<ConversationLocks>,
}

impl<R, I, C> Clone for ConversationStore<R, I, C>
where
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            identities: Arc::clone(&self.identities),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R, I, C> ConversationStore<R, I, C>
where
    R: ConversationRepository,
    I: IdentityRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a conversation store.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        identities: Arc<I>,
        clock: Arc<C>,
        locks: Arc<ConversationLocks>,
    ) -> Self {
        Self {
            repository,
            identities,
            clock,
            locks,
        }
    }

    /// Creates a conversation containing the creator and `participant_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationDomainError::InvalidParticipants`] when fewer than
    /// two distinct users remain, [`ConversationStoreError::UnknownUser`] when
    /// any of them does not resolve to an active identity, or a repository
    /// error when persistence fails.
    pub async fn create(
        &self,
        participant_ids: impl IntoIterator<Item = UserId> + Send,
        creator_id: UserId,
    ) -> ConversationStoreResult<Conversation> {
        let participants = ParticipantSet::for_new_conversation(creator_id, participant_ids)?;
        for participant in &participants {
            self.resolve_active(*participant).await?;
        }

        let conversation = Conversation::new(participants, &*self.clock);
        self.repository.store(&conversation).await?;
        info!(
            conversation_id = %conversation.id(),
            creator_id = %creator_id,
            participants = conversation.participants().len(),
            "conversation created"
        );
        Ok(conversation)
    }

    /// Adds a participant. Adding an existing member succeeds unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationStoreError::NotFound`],
    /// [`ConversationStoreError::UnknownUser`], a lock error, or a repository
    /// error.
    pub async fn add_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        deadline: Deadline,
    ) -> ConversationStoreResult<Conversation> {
        self.get(conversation_id).await?;
        self.resolve_active(user_id).await?;

        let guard = self.locks.acquire(conversation_id, deadline).await?;
        let mut conversation = self.get_locked(&guard).await?;
        if conversation.add_participant(user_id) {
            self.repository.update(&conversation).await?;
            info!(conversation_id = %conversation_id, user_id = %user_id, "participant added");
        }
        Ok(conversation)
    }

    /// Removes a participant. Removing a non-member succeeds unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationDomainError::InvariantViolation`] when fewer than
    /// two participants would remain (nothing is changed),
    /// [`ConversationStoreError::NotFound`], a lock error, or a repository
    /// error.
    pub async fn remove_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        deadline: Deadline,
    ) -> ConversationStoreResult<Conversation> {
        self.get(conversation_id).await?;
        let guard = self.locks.acquire(conversation_id, deadline).await?;
        let mut conversation = self.get_locked(&guard).await?;
        if conversation.remove_participant(user_id)? {
            self.repository.update(&conversation).await?;
            info!(conversation_id = %conversation_id, user_id = %user_id, "participant removed");
        }
        Ok(conversation)
    }

    /// Marks the conversation inactive. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationStoreError::NotFound`], a lock error, or a
    /// repository error.
    pub async fn deactivate(
        &self,
        conversation_id: ConversationId,
        deadline: Deadline,
    ) -> ConversationStoreResult<Conversation> {
        self.get(conversation_id).await?;
        let guard = self.locks.acquire(conversation_id, deadline).await?;
        let mut conversation = self.get_locked(&guard).await?;
        if conversation.deactivate() {
            self.repository.update(&conversation).await?;
            info!(conversation_id = %conversation_id, "conversation deactivated");
        }
        Ok(conversation)
    }

    /// Returns a conversation by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationStoreError::NotFound`] or a repository error.
    pub async fn get(&self, conversation_id: ConversationId) -> ConversationStoreResult<Conversation> {
        self.repository
            .find_by_id(conversation_id)
            .await?
            .ok_or(ConversationStoreError::NotFound(conversation_id))
    }

    /// Lists the user's conversations, most recently active first.
    ///
    /// Conversations without messages come last; ties fall back to the
    /// newest creation time.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        active_only: bool,
    ) -> ConversationStoreResult<Vec<Conversation>> {
        let mut conversations = self.repository.find_by_participant(user_id).await?;
        if active_only {
            conversations.retain(Conversation::is_active);
        }
        conversations.sort_by(activity_order);
        debug!(user_id = %user_id, count = conversations.len(), "listed conversations");
        Ok(conversations)
    }

    /// Returns the lock table shared with the message store.
    pub(crate) fn locks(&self) -> &ConversationLocks {
        &self.locks
    }

    /// Re-reads the guarded conversation.
    pub(crate) async fn get_locked(
        &self,
        guard: &ConversationGuard,
    ) -> ConversationStoreResult<Conversation> {
        self.get(guard.conversation_id()).await
    }

    /// Advances the activity marker of the guarded conversation.
    ///
    /// Only the message store calls this, after validating an append under
    /// the same guard. A missing conversation here means the state was
    /// corrupted between validation and update.
    pub(crate) async fn record_activity(
        &self,
        guard: &ConversationGuard,
        timestamp: DateTime<Utc>,
    ) -> ConversationStoreResult<DateTime<Utc>> {
        let conversation_id = guard.conversation_id();
        self.repository
            .record_activity(conversation_id, timestamp)
            .await
            .map_err(|source| {
                error!(conversation_id = %conversation_id, error = %source, "activity marker update failed");
                ConversationStoreError::ActivityNotRecorded {
                    conversation_id,
                    source,
                }
            })
    }

    /// Puts back a snapshot taken under the same guard, undoing a partially
    /// applied unit.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationStoreError::GuardMismatch`] when `snapshot`
    /// belongs to a conversation other than the guarded one.
    pub(crate) async fn restore(
        &self,
        guard: &ConversationGuard,
        snapshot: &Conversation,
    ) -> ConversationStoreResult<()> {
        if guard.conversation_id() != snapshot.id() {
            return Err(ConversationStoreError::GuardMismatch {
                held: guard.conversation_id(),
                target: snapshot.id(),
            });
        }
        self.repository.update(snapshot).await?;
        Ok(())
    }

    async fn resolve_active(&self, user_id: UserId) -> ConversationStoreResult<()> {
        let user = self.identities.lookup(user_id).await?;
        if !user.is_active() {
            return Err(ConversationStoreError::UnknownUser(user_id));
        }
        Ok(())
    }
}

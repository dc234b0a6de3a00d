//! Conversation aggregate root.

use super::{ConversationDomainError, ConversationId, ParticipantSet};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Conversation aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    participants: ParticipantSet,
    created_at: DateTime<Utc>,
    last_message_at: Option<DateTime<Utc>>,
    is_active: bool,
}

/// Parameter object for reconstructing a persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedConversationData {
    /// Persisted conversation identifier.
    pub id: ConversationId,
    /// Persisted participants in join order.
    pub participant_ids: Vec<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted activity marker.
    pub last_message_at: Option<DateTime<Utc>>,
    /// Persisted activation flag.
    pub is_active: bool,
}

impl Conversation {
    /// Creates an active conversation with no messages yet.
    #[must_use]
    pub fn new(participants: ParticipantSet, clock: &impl Clock) -> Self {
        Self {
            id: ConversationId::new(),
            participants,
            created_at: clock.utc(),
            last_message_at: None,
            is_active: true,
        }
    }

    /// Reconstructs a conversation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedConversationData) -> Self {
        Self {
            id: data.id,
            participants: ParticipantSet::from_persisted(data.participant_ids),
            created_at: data.created_at,
            last_message_at: data.last_message_at,
            is_active: data.is_active,
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> ConversationId {
        self.id
    }

    /// Returns the participants in join order.
    #[must_use]
    pub const fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    /// Returns `true` if the user is a current participant.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.contains(user)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the `sent_at` of the newest appended message, if any.
    #[must_use]
    pub const fn last_message_at(&self) -> Option<DateTime<Utc>> {
        self.last_message_at
    }

    /// Returns whether new messages are accepted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Adds a participant. Returns `false` if already a member.
    pub fn add_participant(&mut self, user: UserId) -> bool {
        self.participants.insert(user)
    }

    /// Removes a participant. Returns `false` if the user was not a member.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationDomainError::InvariantViolation`] when the
    /// conversation would drop below two participants.
    pub fn remove_participant(&mut self, user: UserId) -> Result<bool, ConversationDomainError> {
        self.participants.remove(user)
    }

    /// Advances the activity marker to `timestamp` unless it is older.
    ///
    /// Returns the marker after the update.
    pub fn record_activity(&mut self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let marker = self
            .last_message_at
            .map_or(timestamp, |current| current.max(timestamp));
        self.last_message_at = Some(marker);
        marker
    }

    /// Stops the conversation from accepting messages. Returns `false` if it
    /// was already inactive.
    pub const fn deactivate(&mut self) -> bool {
        let was_active = self.is_active;
        self.is_active = false;
        was_active
    }
}

/// Listing order: most recent activity first, conversations without
/// messages last, ties broken by newest creation and then by identifier.
#[must_use]
pub fn activity_order(left: &Conversation, right: &Conversation) -> Ordering {
    match (left.last_message_at, right.last_message_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| right.created_at.cmp(&left.created_at))
    .then_with(|| right.id.cmp(&left.id))
}

//! Message aggregate root.

use super::{MessageBody, MessageDomainError, MessageId};
use crate::conversation::domain::ConversationId;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A message within a conversation.
///
/// # Invariants
///
/// - sender, conversation and `sent_at` never change after creation
/// - `is_read` only moves from `false` to `true`, never by the sender
/// - once deleted, neither the body nor the read flag changes again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    sender_id: UserId,
    body: MessageBody,
    sent_at: DateTime<Utc>,
    is_read: bool,
    is_deleted: bool,
    edited_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Persisted owning conversation.
    pub conversation_id: ConversationId,
    /// Persisted sender.
    pub sender_id: UserId,
    /// Persisted body.
    pub body: MessageBody,
    /// Persisted send timestamp.
    pub sent_at: DateTime<Utc>,
    /// Persisted read flag.
    pub is_read: bool,
    /// Persisted soft-delete flag.
    pub is_deleted: bool,
    /// Persisted edit timestamp.
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Creates an unread message stamped with the current clock time.
    #[must_use]
    pub fn new(
        conversation_id: ConversationId,
        sender_id: UserId,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender_id,
            body,
            sent_at: clock.utc(),
            is_read: false,
            is_deleted: false,
            edited_at: None,
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            conversation_id: data.conversation_id,
            sender_id: data.sender_id,
            body: data.body,
            sent_at: data.sent_at,
            is_read: data.is_read,
            is_deleted: data.is_deleted,
            edited_at: data.edited_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning conversation.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns the send timestamp.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Returns whether a recipient has read the message.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns whether the message was soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the last edit timestamp, if edited.
    #[must_use]
    pub const fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.edited_at
    }

    /// Returns `true` if the message is waiting to be read by `reader`.
    #[must_use]
    pub fn is_unread_for(&self, reader: UserId) -> bool {
        !self.is_read && !self.is_deleted && self.sender_id != reader
    }

    /// Marks the message read on behalf of `reader`.
    ///
    /// Returns `false` when it was already read.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::SelfReadForbidden`] when `reader` sent
    /// the message and [`MessageDomainError::MessageDeleted`] once deleted.
    pub fn mark_read(&mut self, reader: UserId) -> Result<bool, MessageDomainError> {
        if reader == self.sender_id {
            return Err(MessageDomainError::SelfReadForbidden);
        }
        if self.is_deleted {
            return Err(MessageDomainError::MessageDeleted);
        }
        if self.is_read {
            return Ok(false);
        }
        self.is_read = true;
        Ok(true)
    }

    /// Replaces the body and stamps `edited_at`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::NotAuthor`] unless `editor` sent the
    /// message and [`MessageDomainError::MessageDeleted`] once deleted.
    pub fn edit(
        &mut self,
        editor: UserId,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Result<(), MessageDomainError> {
        self.ensure_author(editor)?;
        if self.is_deleted {
            return Err(MessageDomainError::MessageDeleted);
        }
        self.body = body;
        self.edited_at = Some(clock.utc());
        Ok(())
    }

    /// Soft-deletes the message. Returns `false` if it was already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::NotAuthor`] unless `requester` sent the
    /// message.
    pub fn soft_delete(&mut self, requester: UserId) -> Result<bool, MessageDomainError> {
        self.ensure_author(requester)?;
        if self.is_deleted {
            return Ok(false);
        }
        self.is_deleted = true;
        Ok(true)
    }

    fn ensure_author(&self, user: UserId) -> Result<(), MessageDomainError> {
        if user != self.sender_id {
            return Err(MessageDomainError::NotAuthor);
        }
        Ok(())
    }
}

/// Listing order: newest `sent_at` first, then by identifier so that equal
/// timestamps still page deterministically.
#[must_use]
pub fn newest_first(left: &Message, right: &Message) -> Ordering {
    right
        .sent_at
        .cmp(&left.sent_at)
        .then_with(|| right.id.cmp(&left.id))
}

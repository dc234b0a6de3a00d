//! Entities an authorisation check can be made against.

use crate::conversation::domain::ConversationId;
use crate::message::domain::MessageId;
use std::fmt;

/// What a call operates on.
///
/// Conversation targets are checked against the conversation's membership;
/// message targets against the membership of the message's conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTarget {
    /// A conversation-level operation.
    Conversation(ConversationId),
    /// A message-level operation.
    Message(MessageId),
}

impl From<ConversationId> for AccessTarget {
    fn from(id: ConversationId) -> Self {
        Self::Conversation(id)
    }
}

impl From<MessageId> for AccessTarget {
    fn from(id: MessageId) -> Self {
        Self::Message(id)
    }
}

impl fmt::Display for AccessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversation(id) => write!(f, "conversation:{id}"),
            Self::Message(id) => write!(f, "message:{id}"),
        }
    }
}

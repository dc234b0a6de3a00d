//! Domain model for conversations.
//!
//! Membership rules live on the aggregate so that every store operation
//! enforces them the same way.

mod conversation;
mod error;
mod ids;
mod participants;

pub use conversation::{Conversation, PersistedConversationData, activity_order};
pub use error::ConversationDomainError;
pub use ids::ConversationId;
pub use participants::{MIN_PARTICIPANTS, ParticipantSet};

//! Error types for conversation membership rules.

use thiserror::Error;

/// Errors returned while constructing or mutating conversations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConversationDomainError {
    /// Fewer than two distinct participants were supplied at creation.
    #[error("conversation requires at least 2 participants")]
    InvalidParticipants {
        /// Number of distinct participants supplied, creator included.
        distinct: usize,
    },

    /// Removing the participant would leave fewer than two members.
    #[error("conversation requires at least 2 participants; participant cannot be removed")]
    InvariantViolation {
        /// Current number of participants.
        current: usize,
    },
}

//! Error types for message validation and lifecycle rules.

use thiserror::Error;

/// Errors returned while constructing or mutating messages.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MessageDomainError {
    /// The body is empty after trimming.
    #[error("message body must not be empty")]
    EmptyBody,

    /// The body exceeds the configured length.
    #[error("message body has {actual} characters, exceeds limit of {max}")]
    BodyTooLong {
        /// Configured maximum in characters.
        max: usize,
        /// Actual length in characters.
        actual: usize,
    },

    /// The sender tried to mark their own message as read.
    #[error("cannot mark your own message as read")]
    SelfReadForbidden,

    /// Only the sender may edit or delete a message.
    #[error("only the author of a message may change it")]
    NotAuthor,

    /// The message was deleted and accepts no further changes.
    #[error("message has been deleted")]
    MessageDeleted,
}

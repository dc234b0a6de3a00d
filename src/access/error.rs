//! Errors surfaced by the access gate.

use crate::conversation::services::ConversationStoreError;
use crate::deadline::DeadlineExceeded;
use crate::error::ErrorCategory;
use crate::identity::{domain::UserId, ports::IdentityError};
use crate::message::services::MessageStoreError;
use std::fmt;
use thiserror::Error;

/// Why the gate refused a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForbiddenReason {
    /// The actor is not a current participant of the target conversation.
    NotParticipant,
    /// The actor's account is disabled.
    InactiveAccount,
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotParticipant => "not a participant of this conversation",
            Self::InactiveAccount => "account is inactive",
        })
    }
}

/// Errors returned by [`super::AccessGate`] operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The acting user could not be resolved.
    #[error("unknown user")]
    UnknownUser(UserId),

    /// The authorisation check failed; nothing was executed.
    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    /// The caller's deadline passed before the operation started.
    #[error(transparent)]
    DeadlineExceeded(#[from] DeadlineExceeded),

    /// The identity registry failed.
    #[error("identity registry unavailable")]
    IdentityUnavailable(#[source] IdentityError),

    /// The conversation store rejected the operation.
    #[error(transparent)]
    Conversation(#[from] ConversationStoreError),

    /// The message store rejected the operation.
    #[error(transparent)]
    Message(#[from] MessageStoreError),
}

impl AccessError {
    /// Returns the transport-neutral category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownUser(_) => ErrorCategory::NotFound,
            Self::Forbidden(_) => ErrorCategory::Forbidden,
            Self::DeadlineExceeded(_) | Self::IdentityUnavailable(_) => ErrorCategory::Unavailable,
            Self::Conversation(err) => err.category(),
            Self::Message(err) => err.category(),
        }
    }
}

impl From<IdentityError> for AccessError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound(id) => Self::UnknownUser(id),
            unavailable @ IdentityError::Unavailable(_) => Self::IdentityUnavailable(unavailable),
        }
    }
}

/// Result type for access gate operations.
pub type AccessResult<T> = Result<T, AccessError>;

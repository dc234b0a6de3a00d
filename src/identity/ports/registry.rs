//! Read-only identity registry port.

use crate::error::ErrorCategory;
use crate::identity::domain::{User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity lookups.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity lookup contract.
///
/// The messaging core never mutates identities through this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Resolves a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] when the identifier is unknown, or
    /// [`IdentityError::Unavailable`] when the backing store fails.
    async fn lookup(&self, id: UserId) -> IdentityResult<User>;
}

/// Errors returned by identity registry implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// No user has the identifier.
    #[error("user not found")]
    NotFound(UserId),

    /// The registry could not be queried.
    #[error("identity registry unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a backend failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Returns the transport-neutral category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Unavailable(_) => ErrorCategory::Unavailable,
        }
    }
}

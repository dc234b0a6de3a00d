//! Error types for identity value validation.

use thiserror::Error;

/// Errors returned while constructing identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The e-mail address is not of the form `local@domain`.
    #[error("invalid e-mail address '{0}'")]
    InvalidEmail(String),

    /// The role value is unsupported.
    #[error("unknown user role: {0}")]
    UnknownRole(String),
}

//! Transport-neutral error classification shared by every layer.
//!
//! Each error type in the crate maps itself onto an [`ErrorCategory`] so that
//! an outer API layer can pick a status code without matching on every
//! variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a domain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A referenced entity or identity could not be resolved.
    NotFound,
    /// The acting user may not perform the operation.
    Forbidden,
    /// The request carried invalid input.
    InvalidInput,
    /// The operation would break a data-model invariant.
    InvariantViolation,
    /// A collaborator, lock or deadline prevented the operation from running.
    Unavailable,
    /// A broken internal invariant; never caused by the caller.
    Internal,
}

impl ErrorCategory {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidInput => "invalid_input",
            Self::InvariantViolation => "invariant_violation",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }

    /// Returns `true` when the failure is the caller's to fix.
    #[must_use]
    pub const fn is_user_facing(self) -> bool {
        !matches!(self, Self::Unavailable | Self::Internal)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Per-call context supplied by the outer API layer.

use crate::deadline::Deadline;
use crate::identity::domain::UserId;

/// The authenticated user acting on a call, plus an optional deadline.
///
/// # Examples
///
/// ```
/// use parlour::access::RequestContext;
/// use parlour::deadline::Deadline;
/// use parlour::identity::domain::UserId;
///
/// let actor = UserId::new();
/// let ctx = RequestContext::new(actor);
/// assert_eq!(ctx.actor(), actor);
/// assert_eq!(ctx.deadline(), Deadline::NONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    actor: UserId,
    deadline: Deadline,
}

impl RequestContext {
    /// Creates a context without a deadline.
    #[must_use]
    pub const fn new(actor: UserId) -> Self {
        Self {
            actor,
            deadline: Deadline::NONE,
        }
    }

    /// Attaches a deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }
}

//! Caller-supplied deadlines for mutating operations.
//!
//! A deadline never interrupts work that has started mutating state. It is
//! checked before a conversation lock is requested, bounds the wait for the
//! lock, and is checked once more after the lock is held.

use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Optional point in time after which no new mutation may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline(Option<Instant>);

/// The deadline passed before the operation could be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded before the operation was applied")]
pub struct DeadlineExceeded;

impl Deadline {
    /// A deadline that never expires.
    pub const NONE: Self = Self(None);

    /// Creates a deadline at the given instant.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// Creates a deadline `timeout` from now.
    ///
    /// A timeout too large to represent as an instant never expires.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now().checked_add(timeout))
    }

    /// Returns the instant, if one was set.
    #[must_use]
    pub const fn instant(self) -> Option<Instant> {
        self.0
    }

    /// Returns the time left, or `None` when no deadline is set.
    ///
    /// An expired deadline reports [`Duration::ZERO`].
    #[must_use]
    pub fn remaining(self) -> Option<Duration> {
        self.0
            .map(|instant| instant.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn has_expired(self) -> bool {
        self.0.is_some_and(|instant| Instant::now() >= instant)
    }

    /// Fails when the deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns [`DeadlineExceeded`] once the deadline has passed.
    pub fn check(self) -> Result<(), DeadlineExceeded> {
        if self.has_expired() {
            return Err(DeadlineExceeded);
        }
        Ok(())
    }

    /// Returns the shorter of `bound` and the remaining time.
    #[must_use]
    pub fn bound(self, bound: Duration) -> Duration {
        self.remaining().map_or(bound, |remaining| remaining.min(bound))
    }
}

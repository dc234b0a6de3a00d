//! Per-conversation mutual exclusion.
//!
//! Every mutation of a conversation, and of the messages it owns, runs while
//! holding that conversation's lock. Locks of different conversations are
//! independent; the shared table is only touched to fetch a lock handle.

use crate::conversation::domain::ConversationId;
use crate::deadline::{Deadline, DeadlineExceeded};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

/// Errors raised while acquiring a conversation lock.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LockError {
    /// The lock was not granted within the configured bound.
    #[error("conversation is busy; try again")]
    Timeout(ConversationId),

    /// The caller's deadline passed while waiting or right after acquiring.
    #[error(transparent)]
    DeadlineExceeded(#[from] DeadlineExceeded),
}

/// Table of async mutexes keyed by conversation.
#[derive(Debug)]
pub struct ConversationLocks {
    locks: RwLock<HashMap<ConversationId, Arc<Mutex<()>>>>,
    timeout: Duration,
}

/// Proof that the holder has exclusive write access to one conversation.
#[derive(Debug)]
pub struct ConversationGuard {
    conversation_id: ConversationId,
    _guard: OwnedMutexGuard<()>,
}

impl ConversationGuard {
    /// Returns the conversation this guard protects.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }
}

impl ConversationLocks {
    /// Creates an empty lock table with the given acquisition bound.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    /// Returns the acquisition bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Acquires the lock for `conversation_id`.
    ///
    /// Waits at most the configured timeout or until `deadline`, whichever
    /// is sooner. The deadline is checked again once the lock is held so no
    /// mutation starts after it.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::DeadlineExceeded`] when the deadline passes and
    /// [`LockError::Timeout`] when the bound elapses first.
    pub async fn acquire(
        &self,
        conversation_id: ConversationId,
        deadline: Deadline,
    ) -> Result<ConversationGuard, LockError> {
        deadline.check()?;
        let mutex = self.handle(conversation_id);
        let wait = deadline.bound(self.timeout);

        let Ok(guard) = tokio::time::timeout(wait, mutex.lock_owned()).await else {
            if deadline.has_expired() {
                return Err(LockError::DeadlineExceeded(DeadlineExceeded));
            }
            warn!(conversation_id = %conversation_id, wait = ?wait, "conversation lock timed out");
            return Err(LockError::Timeout(conversation_id));
        };

        deadline.check()?;
        Ok(ConversationGuard {
            conversation_id,
            _guard: guard,
        })
    }

    fn handle(&self, conversation_id: ConversationId) -> Arc<Mutex<()>> {
        let existing = self
            .locks
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&conversation_id)
            .cloned();
        if let Some(mutex) = existing {
            return mutex;
        }
        let mut table = self
            .locks
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(table.entry(conversation_id).or_default())
    }
}

impl Default for ConversationLocks {
    fn default() -> Self {
        Self::new(crate::config::MessagingConfig::default().lock_timeout())
    }
}

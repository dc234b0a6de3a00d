//! In-memory identity registry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{User, UserId},
    ports::{IdentityError, IdentityRegistry, IdentityResult},
};

/// Thread-safe in-memory identity registry.
///
/// Seeded through [`InMemoryIdentityRegistry::register`]; the messaging core
/// itself only reads from it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityRegistry {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryIdentityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] if the internal lock is
    /// poisoned.
    pub fn register(&self, user: User) -> IdentityResult<UserId> {
        let mut users = self
            .users
            .write()
            .map_err(|err| IdentityError::unavailable(std::io::Error::other(err.to_string())))?;
        let id = user.id();
        users.insert(id, user);
        Ok(id)
    }

    /// Returns the number of registered users.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    /// Returns `true` if no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryIdentityRegistry {
    async fn lookup(&self, id: UserId) -> IdentityResult<User> {
        let users = self
            .users
            .read()
            .map_err(|err| IdentityError::unavailable(std::io::Error::other(err.to_string())))?;
        users.get(&id).cloned().ok_or(IdentityError::NotFound(id))
    }
}

//! Insertion-ordered participant membership.

use super::ConversationDomainError;
use crate::identity::domain::UserId;
use serde::{Deserialize, Serialize};

/// Smallest membership a conversation may have.
pub const MIN_PARTICIPANTS: usize = 2;

/// Distinct participant identifiers in the order they joined.
///
/// Conversations are small, so membership is a vector with linear lookups
/// rather than a hashed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UserId>", into = "Vec<UserId>")]
pub struct ParticipantSet(Vec<UserId>);

impl ParticipantSet {
    /// Builds the initial membership of a new conversation.
    ///
    /// The creator is placed first; duplicates collapse onto their first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationDomainError::InvalidParticipants`] when fewer
    /// than [`MIN_PARTICIPANTS`] distinct users remain.
    pub fn for_new_conversation(
        creator: UserId,
        participants: impl IntoIterator<Item = UserId>,
    ) -> Result<Self, ConversationDomainError> {
        let mut set = Self(vec![creator]);
        for participant in participants {
            set.insert(participant);
        }
        if set.len() < MIN_PARTICIPANTS {
            return Err(ConversationDomainError::InvalidParticipants {
                distinct: set.len(),
            });
        }
        Ok(set)
    }

    /// Rebuilds membership from persisted identifiers, dropping duplicates.
    #[must_use]
    pub fn from_persisted(participants: impl IntoIterator<Item = UserId>) -> Self {
        let mut set = Self(Vec::new());
        for participant in participants {
            set.insert(participant);
        }
        set
    }

    /// Returns `true` if the user is a member.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.0.contains(&user)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates members in join order.
    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.0.iter().copied()
    }

    /// Returns members in join order.
    #[must_use]
    pub fn as_slice(&self) -> &[UserId] {
        &self.0
    }

    /// Appends a member. Returns `false` if already present.
    pub(crate) fn insert(&mut self, user: UserId) -> bool {
        if self.contains(user) {
            return false;
        }
        self.0.push(user);
        true
    }

    /// Removes a member. Returns `false` if the user was not a member.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationDomainError::InvariantViolation`] when the
    /// removal would leave fewer than [`MIN_PARTICIPANTS`] members; the set
    /// is left unchanged.
    pub(crate) fn remove(&mut self, user: UserId) -> Result<bool, ConversationDomainError> {
        let Some(position) = self.0.iter().position(|member| *member == user) else {
            return Ok(false);
        };
        if self.len() <= MIN_PARTICIPANTS {
            return Err(ConversationDomainError::InvariantViolation {
                current: self.len(),
            });
        }
        self.0.remove(position);
        Ok(true)
    }
}

impl TryFrom<Vec<UserId>> for ParticipantSet {
    type Error = ConversationDomainError;

    /// Rebuilds membership from decoded identifiers, dropping duplicates.
    fn try_from(participants: Vec<UserId>) -> Result<Self, Self::Error> {
        let set = Self::from_persisted(participants);
        if set.len() < MIN_PARTICIPANTS {
            return Err(ConversationDomainError::InvalidParticipants {
                distinct: set.len(),
            });
        }
        Ok(set)
    }
}

impl From<ParticipantSet> for Vec<UserId> {
    fn from(set: ParticipantSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a ParticipantSet {
    type Item = &'a UserId;
    type IntoIter = std::slice::Iter<'a, UserId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

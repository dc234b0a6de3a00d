//! Optional narrowing of message listings.

use super::Message;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};

/// Criteria applied on top of the default listing rules.
///
/// All criteria are combined with "and"; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    sender: Option<UserId>,
    sent_after: Option<DateTime<Utc>>,
    sent_before: Option<DateTime<Utc>>,
    body_contains: Option<String>,
}

impl MessageFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps messages from `sender` only.
    #[must_use]
    pub fn from_sender(mut self, sender: UserId) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Keeps messages sent at or after `instant`.
    #[must_use]
    pub fn sent_after(mut self, instant: DateTime<Utc>) -> Self {
        self.sent_after = Some(instant);
        self
    }

    /// Keeps messages sent at or before `instant`.
    #[must_use]
    pub fn sent_before(mut self, instant: DateTime<Utc>) -> Self {
        self.sent_before = Some(instant);
        self
    }

    /// Keeps messages whose body contains `needle`, ignoring case.
    #[must_use]
    pub fn body_contains(mut self, needle: impl Into<String>) -> Self {
        self.body_contains = Some(needle.into().to_lowercase());
        self
    }

    /// Returns `true` if `message` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        self.sender.is_none_or(|sender| message.sender_id() == sender)
            && self
                .sent_after
                .is_none_or(|after| message.sent_at() >= after)
            && self
                .sent_before
                .is_none_or(|before| message.sent_at() <= before)
            && self.body_contains.as_deref().is_none_or(|needle| {
                message.body().as_str().to_lowercase().contains(needle)
            })
    }
}

//! Validated message body.

use super::MessageDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message text, never blank and bounded in length.
///
/// The text is kept exactly as written; only the emptiness check ignores
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageBody(String);

impl MessageBody {
    /// Creates a validated body of at most `max_chars` characters.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::EmptyBody`] when the text is blank and
    /// [`MessageDomainError::BodyTooLong`] when it is longer than `max_chars`.
    ///
    /// # Examples
    ///
    /// ```
    /// use parlour::message::domain::{MessageBody, MessageDomainError};
    ///
    /// assert_eq!(MessageBody::new("hi", 10).map(|b| b.len_chars()), Ok(2));
    /// assert_eq!(MessageBody::new("   ", 10), Err(MessageDomainError::EmptyBody));
    /// ```
    pub fn new(value: impl Into<String>, max_chars: usize) -> Result<Self, MessageDomainError> {
        let text = value.into();
        if text.trim().is_empty() {
            return Err(MessageDomainError::EmptyBody);
        }
        let actual = text.chars().count();
        if actual > max_chars {
            return Err(MessageDomainError::BodyTooLong {
                max: max_chars,
                actual,
            });
        }
        Ok(Self(text))
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length in characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.0.chars().count()
    }
}

impl TryFrom<String> for MessageBody {
    type Error = MessageDomainError;

    /// Accepts any non-blank decoded text. Length limits are configuration
    /// and are applied when a body is written, not when it is read back.
    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text, usize::MAX)
    }
}

impl From<MessageBody> for String {
    fn from(body: MessageBody) -> Self {
        body.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Runtime configuration for the messaging core.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Tunables for pagination, locking and message validation.
///
/// Missing fields fall back to [`MessagingConfig::default`] when parsing.
///
/// # Examples
///
/// ```
/// use parlour::config::MessagingConfig;
///
/// let config = MessagingConfig::from_json_str(r#"{ "max_page_size": 50 }"#)
///     .expect("valid configuration");
/// assert_eq!(config.max_page_size, 50);
/// assert_eq!(config.default_page_size, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessagingConfig {
    /// Page size used when a caller does not ask for one.
    pub default_page_size: usize,
    /// Upper bound applied to caller-supplied page sizes.
    pub max_page_size: usize,
    /// Longest wait for a conversation lock, in milliseconds.
    pub lock_timeout_ms: u64,
    /// Maximum message body length in characters.
    pub max_body_chars: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            lock_timeout_ms: 5_000,
            max_body_chars: 100_000,
        }
    }
}

impl MessagingConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] when the values are inconsistent.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values are usable together.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid("default_page_size must be positive"));
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::Invalid(
                "max_page_size must not be smaller than default_page_size",
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid("lock_timeout_ms must be positive"));
        }
        if self.max_body_chars == 0 {
            return Err(ConfigError::Invalid("max_body_chars must be positive"));
        }
        Ok(())
    }

    /// Returns the lock acquisition bound.
    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Sets the lock acquisition bound.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the maximum body length.
    #[must_use]
    pub const fn with_max_body_chars(mut self, max_body_chars: usize) -> Self {
        self.max_body_chars = max_body_chars;
        self
    }

    /// Sets the default and maximum page sizes.
    #[must_use]
    pub const fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be parsed.
    #[error("could not parse messaging configuration: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document parsed but holds unusable values.
    #[error("invalid messaging configuration: {0}")]
    Invalid(&'static str),
}

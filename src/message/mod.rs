//! Messages and their lifecycle.
//!
//! A message is appended once and afterwards only changes through mark-read,
//! edit and soft delete. Appending also advances the owning conversation's
//! activity marker, as a single unit under that conversation's lock.
//!
//! - Domain types in [`domain`] ([`domain::Message`], [`domain::MessageBody`],
//!   [`domain::PageRequest`], [`domain::MessageFilter`])
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The [`services::MessageStore`] in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

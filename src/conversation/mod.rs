//! Conversations and participant membership.
//!
//! A conversation is an insertion-ordered set of at least two participants
//! plus an activity marker (`last_message_at`) that the message store
//! advances on every successful append. The module follows the same
//! hexagonal layout as the rest of the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The [`services::ConversationStore`] and per-conversation locking in
//!   [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

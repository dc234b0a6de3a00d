//! Port contracts for conversation persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the conversation
//! and message stores.

pub mod repository;

pub use repository::{
    ConversationRepository, ConversationRepositoryError, ConversationRepositoryResult,
};

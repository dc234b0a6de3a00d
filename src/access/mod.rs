//! Authorisation gate in front of the conversation and message stores.
//!
//! Every operation resolves the acting user through the identity registry
//! and checks participancy against an [`AccessTarget`] before delegating.
//! The gate holds no state of its own and never takes a conversation lock,
//! so authorisation always completes before any store locks.

mod context;
mod error;
mod gate;
mod target;

pub use context::RequestContext;
pub use error::{AccessError, AccessResult, ForbiddenReason};
pub use gate::{AccessGate, ConversationSummary};
pub use target::AccessTarget;

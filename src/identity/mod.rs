//! Identity lookup for the messaging core.
//!
//! Users are owned by an external identity subsystem. This module only models
//! the read-only view the conversation and message stores need:
//!
//! - Domain types in [`domain`]
//! - The [`ports::IdentityRegistry`] lookup contract in [`ports`]
//! - An in-memory registry in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

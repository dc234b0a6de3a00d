//! Parlour: conversation and message core for a marketplace messaging system.
//!
//! This crate owns conversations between users, the messages exchanged in
//! them, and the authorisation rules that decide who may act on either. It
//! exposes plain Rust operations; transports, authentication and push
//! delivery live outside.
//!
//! # Architecture
//!
//! Parlour follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and identity lookup
//! - **Adapters**: Concrete implementations of ports (in-memory today)
//! - **Services**: Stores that enforce invariants across aggregates
//!
//! # Modules
//!
//! - [`identity`]: Read-only view of users owned by an identity subsystem
//! - [`conversation`]: Conversations, participant membership and locking
//! - [`message`]: Message lifecycle, pagination and filtering
//! - [`access`]: The authorising facade every external call goes through
//! - [`config`], [`deadline`], [`error`]: Cross-cutting support types

pub mod access;
pub mod config;
pub mod conversation;
pub mod deadline;
pub mod error;
pub mod identity;
pub mod message;

#[cfg(test)]
pub(crate) mod test_support;

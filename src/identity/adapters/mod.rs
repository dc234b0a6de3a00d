//! Adapter implementations for the identity registry port.

pub mod memory;

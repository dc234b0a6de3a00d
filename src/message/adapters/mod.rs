//! Adapter implementations for message ports.

pub mod memory;

//! Adapter implementations for conversation ports.

pub mod memory;

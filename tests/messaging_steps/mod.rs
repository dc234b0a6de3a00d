//! Step definitions for conversation messaging scenarios.

mod given;
mod then;
mod when;

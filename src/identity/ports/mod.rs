//! Port contracts for identity lookup.

pub mod registry;

#[cfg(test)]
pub use registry::MockIdentityRegistry;
pub use registry::{IdentityError, IdentityRegistry, IdentityResult};

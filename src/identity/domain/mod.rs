//! Domain model for user identities.

mod error;
mod ids;
mod user;

pub use error::IdentityDomainError;
pub use ids::UserId;
pub use user::{DisplayName, EmailAddress, User, UserRole};

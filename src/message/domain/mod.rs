//! Domain model for messages.

mod body;
mod error;
mod filter;
mod ids;
mod message;
mod page;

pub use body::MessageBody;
pub use error::MessageDomainError;
pub use filter::MessageFilter;
pub use ids::MessageId;
pub use message::{Message, PersistedMessageData, newest_first};
pub use page::{Page, PageRequest};

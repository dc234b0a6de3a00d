//! Application services for conversations.

mod locks;
mod store;

pub use locks::{ConversationGuard, ConversationLocks, LockError};
pub use store::{ConversationStore, ConversationStoreError, ConversationStoreResult};

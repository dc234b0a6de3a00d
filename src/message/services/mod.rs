//! Application services for messages.

mod store;

pub use store::{MessageStore, MessageStoreError, MessageStoreResult};

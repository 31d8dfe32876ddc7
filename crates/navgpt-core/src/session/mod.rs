//! Conversations and the persisted collection holding them.

mod conversation;
mod recency;
mod store;

pub use conversation::{Conversation, ConversationSummary, Message, Role, DEFAULT_TITLE};
pub use recency::RecencyGroup;
pub use store::{chat_store_key, SessionStore};

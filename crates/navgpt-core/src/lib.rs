pub mod error;
pub mod config;
pub mod storage;
pub mod preferences;
pub mod session;
pub mod context;
pub mod relay;
pub mod present;
pub mod chat;

// Re-export key types
pub use error::NavError;
pub use config::Settings;
pub use storage::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use preferences::{FontSize, PreferencesStore, PreferencesUpdate, Theme, UserPreferences};
pub use session::{Conversation, ConversationSummary, Message, RecencyGroup, Role, SessionStore};
pub use context::format_context;
pub use relay::{HttpRelay, Relay, RelayFailure, RelayOutcome};
pub use present::{segments, CodeBlock, Segment, Segments, Step};
pub use chat::ChatSession;

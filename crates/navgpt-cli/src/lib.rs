// Library interface for navgpt-cli
// The binary in main.rs is a thin wrapper; everything testable lives here.

pub mod app;
pub mod commands;
pub mod render;

// Re-export commonly used items for easier testing
pub use app::{open_snapshots, App, Flow};
pub use commands::{handle_command, CommandResult};

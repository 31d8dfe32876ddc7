use navgpt_core::{FontSize, Theme};

/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Start a fresh conversation.
    NewConversation,
    /// List saved conversations grouped by day.
    ListConversations,
    /// Print the messages of the current conversation.
    ShowConversation,
    /// Make the conversation with this id (or id prefix) current.
    SwitchConversation(String),
    /// Rename the current conversation.
    RenameConversation(String),
    /// Delete a conversation; `None` means the current one.
    DeleteConversation(Option<String>),
    /// Show stored preferences.
    ShowPreferences,
    SetTheme(Theme),
    SetFontSize(FontSize),
    SetNotifications(bool),
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,

        // Conversation commands
        "/new" => CommandResult::NewConversation,
        "/list" | "/chats" => CommandResult::ListConversations,
        "/show" => CommandResult::ShowConversation,
        "/switch" | "/open" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /switch <conversation-id>".into())
            } else {
                CommandResult::SwitchConversation(arg.to_string())
            }
        }
        "/rename" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /rename <title>".into())
            } else {
                CommandResult::RenameConversation(arg.to_string())
            }
        }
        "/delete" | "/rm" => {
            if arg.is_empty() {
                CommandResult::DeleteConversation(None)
            } else {
                CommandResult::DeleteConversation(Some(arg.to_string()))
            }
        }

        // Preference commands
        "/prefs" | "/preferences" => CommandResult::ShowPreferences,
        "/theme" => match arg.parse::<Theme>() {
            Ok(theme) => CommandResult::SetTheme(theme),
            Err(_) => CommandResult::Message("Usage: /theme <light|dark>".into()),
        },
        "/font" => match arg.parse::<FontSize>() {
            Ok(size) => CommandResult::SetFontSize(size),
            Err(_) => CommandResult::Message("Usage: /font <small|medium|large>".into()),
        },
        "/notifications" => match arg {
            "on" | "true" | "yes" => CommandResult::SetNotifications(true),
            "off" | "false" | "no" => CommandResult::SetNotifications(false),
            _ => CommandResult::Message("Usage: /notifications <on|off>".into()),
        },

        "/version" => CommandResult::Message(format!("NavGPT CLI v{}", env!("CARGO_PKG_VERSION"))),

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ NavGPT Commands ──────────────────────────────────────────────╮

  CONVERSATIONS
    /new                      Start a fresh conversation
    /list, /chats             List conversations by day
    /show                     Print the current conversation
    /switch <id>              Switch to a conversation (id prefix ok)
    /rename <title>           Rename the current conversation
    /delete [id]              Delete a conversation (default: current)

  PREFERENCES
    /prefs                    Show stored preferences
    /theme <light|dark>       Set theme
    /font <small|medium|large>
                              Set font size
    /notifications <on|off>   Toggle notifications

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit

  Anything else is sent to the assistant.

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}

use crate::context::format_context;
use crate::error::Result;
use crate::relay::Relay;
use crate::session::{Message, Role, SessionStore, DEFAULT_TITLE};

const TITLE_MAX_CHARS: usize = 40;

/// Drives one conversation turn: history → prompt → relay → store.
pub struct ChatSession<R: Relay> {
    store: SessionStore,
    relay: R,
}

impl<R: Relay> ChatSession<R> {
    pub fn new(store: SessionStore, relay: R) -> Self {
        Self { store, relay }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Send `text` in the current conversation and return the assistant's
    /// reply. The reply (or fallback message) is always recorded. Blank input
    /// is ignored and yields `None`.
    pub async fn submit(&mut self, text: &str) -> Result<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let id = self.store.ensure_current()?;
        let history = self.store.messages(&id).map(|m| m.to_vec()).unwrap_or_default();

        self.store.append_message(&id, Message::user(text))?;
        self.maybe_title(&id, text)?;

        let prompt = format_context(text, &history);
        let reply = self.relay.send(&prompt).await.into_display_text();

        self.store.append_message(&id, Message::assistant(reply.clone()))?;
        Ok(Some(reply))
    }

    /// Name an untitled conversation after its first user message.
    fn maybe_title(&mut self, id: &str, text: &str) -> Result<()> {
        let Some(conversation) = self.store.get(id) else {
            return Ok(());
        };
        let user_messages = conversation
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count();
        if conversation.title != DEFAULT_TITLE || user_messages != 1 {
            return Ok(());
        }
        self.store.rename_conversation(id, &title_from_message(text))?;
        Ok(())
    }
}

/// Title derived from a message: its first line, cut to a fixed length.
pub fn title_from_message(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > TITLE_MAX_CHARS {
        let title: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", title.trim_end())
    } else if first_line.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_short_message() {
        assert_eq!(title_from_message("2+2?"), "2+2?");
        assert_eq!(title_from_message("  hello\nworld"), "hello");
    }

    #[test]
    fn test_title_long_message_truncates() {
        let long = "a".repeat(100);
        let title = title_from_message(&long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_title_multibyte_boundary() {
        let text = "é".repeat(50);
        let title = title_from_message(&text);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }
}

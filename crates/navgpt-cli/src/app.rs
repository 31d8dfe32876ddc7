use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use navgpt_core::preferences::chat_namespace;
use navgpt_core::{
    ChatSession, FileSnapshotStore, HttpRelay, MemorySnapshotStore, NavError, PreferencesStore,
    PreferencesUpdate, Relay, SessionStore, Settings, SnapshotStore,
};

use crate::commands::{handle_command, CommandResult};
use crate::render;

/// Whether the input loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Open the snapshot storage selected by the settings.
pub fn open_snapshots(settings: &Settings, ephemeral: bool) -> Result<Arc<dyn SnapshotStore>> {
    if ephemeral {
        return Ok(Arc::new(MemorySnapshotStore::new()));
    }
    let store = FileSnapshotStore::with_dir(settings.data_dir())?;
    tracing::debug!("Using snapshot directory {}", store.base_dir().display());
    Ok(Arc::new(store))
}

pub struct App<R: Relay> {
    chat: ChatSession<R>,
    prefs: PreferencesStore,
}

impl App<HttpRelay> {
    pub fn open(settings: &Settings, snapshots: Arc<dyn SnapshotStore>) -> Result<Self> {
        let prefs = PreferencesStore::load(snapshots.clone())?;
        let relay = HttpRelay::from_settings(settings, prefs.user_id());
        Self::with_relay(snapshots, prefs, relay)
    }
}

impl<R: Relay> App<R> {
    /// Build the app around an already loaded preferences store. The chat
    /// collection is namespaced by the stored user id.
    pub fn with_relay(
        snapshots: Arc<dyn SnapshotStore>,
        prefs: PreferencesStore,
        relay: R,
    ) -> Result<Self> {
        let namespace = chat_namespace(snapshots.as_ref());
        let mut store = SessionStore::open(snapshots, &namespace);
        store.ensure_current()?;

        Ok(Self {
            chat: ChatSession::new(store, relay),
            prefs,
        })
    }

    pub fn chat(&self) -> &ChatSession<R> {
        &self.chat
    }

    pub fn preferences(&self) -> &PreferencesStore {
        &self.prefs
    }

    /// Process one line of input, appending anything to show to `out`.
    pub async fn handle_line(&mut self, line: &str, out: &mut String) -> Result<Flow> {
        match handle_command(line) {
            CommandResult::Quit => return Ok(Flow::Quit),
            CommandResult::Message(msg) => push_line(out, &msg),
            CommandResult::NotACommand => {
                if let Some(reply) = self.chat.submit(line).await? {
                    out.push_str(&render::render_reply(&reply));
                }
            }
            CommandResult::NewConversation => {
                let id = self.chat.store_mut().create_conversation()?;
                push_line(out, &format!("Started conversation {}", render::short_id(&id)));
            }
            CommandResult::ListConversations => {
                let store = self.chat.store();
                out.push_str(&render::render_conversation_list(
                    &store.grouped(render::today()),
                    store.current_id(),
                ));
            }
            CommandResult::ShowConversation => self.show_current(out),
            CommandResult::SwitchConversation(query) => match self.resolve_id(&query) {
                Ok(id) => {
                    self.chat.store_mut().select_conversation(&id)?;
                    self.show_current(out);
                }
                Err(miss) => push_line(out, &miss),
            },
            CommandResult::RenameConversation(title) => {
                let id = self.chat.store_mut().ensure_current()?;
                if self.chat.store_mut().rename_conversation(&id, &title)? {
                    push_line(out, &format!("Renamed to {title}"));
                } else {
                    push_line(out, "Title unchanged");
                }
            }
            CommandResult::DeleteConversation(query) => self.delete(query.as_deref(), out)?,
            CommandResult::ShowPreferences => {
                out.push_str(&render::render_preferences(self.prefs.preferences()));
            }
            CommandResult::SetTheme(theme) => {
                self.prefs.update(PreferencesUpdate {
                    theme: Some(theme),
                    ..Default::default()
                })?;
                push_line(out, &format!("Theme set to {theme:?}"));
            }
            CommandResult::SetFontSize(font_size) => {
                self.prefs.update(PreferencesUpdate {
                    font_size: Some(font_size),
                    ..Default::default()
                })?;
                push_line(out, &format!("Font size set to {font_size:?}"));
            }
            CommandResult::SetNotifications(enabled) => {
                self.prefs.update(PreferencesUpdate {
                    notifications: Some(enabled),
                    ..Default::default()
                })?;
                push_line(
                    out,
                    if enabled {
                        "Notifications on"
                    } else {
                        "Notifications off"
                    },
                );
            }
        }
        Ok(Flow::Continue)
    }

    /// Exact id, or a unique id prefix. The error is the line to show the
    /// user when nothing, or more than one conversation, matches.
    fn resolve_id(&self, query: &str) -> std::result::Result<String, String> {
        let store = self.chat.store();
        if store.contains(query) {
            return Ok(query.to_string());
        }
        let mut matches: Vec<String> = store
            .list()
            .into_iter()
            .filter(|s| s.id.starts_with(query))
            .map(|s| s.id)
            .collect();
        match matches.len() {
            0 => Err(format!("No conversation matches '{query}'")),
            1 => Ok(matches.remove(0)),
            n => Err(format!("'{query}' matches {n} conversations; use a longer id prefix")),
        }
    }

    fn delete(&mut self, query: Option<&str>, out: &mut String) -> Result<()> {
        let id = match query {
            Some(q) => match self.resolve_id(q) {
                Ok(id) => id,
                Err(miss) => {
                    push_line(out, &miss);
                    return Ok(());
                }
            },
            None => match self.chat.store().current_id() {
                Some(id) => id.to_string(),
                None => {
                    push_line(out, "No current conversation");
                    return Ok(());
                }
            },
        };

        let was_current = self.chat.store().current_id() == Some(id.as_str());
        let store = self.chat.store_mut();
        store.delete_conversation(&id)?;
        push_line(out, &format!("Deleted conversation {}", render::short_id(&id)));

        if was_current {
            // Fall back to the newest remaining conversation, or a new one.
            match store.list().into_iter().next() {
                Some(next) => store.select_conversation(&next.id)?,
                None => {
                    store.create_conversation()?;
                }
            }
            self.show_current(out);
        }
        Ok(())
    }

    fn show_current(&self, out: &mut String) {
        let store = self.chat.store();
        let (Some(id), Some(conversation)) = (store.current_id(), store.current()) else {
            push_line(out, "No current conversation");
            return;
        };

        push_line(
            out,
            &format!("── {} [{}] ──", conversation.display_title(), render::short_id(id)),
        );
        for message in &conversation.messages {
            out.push_str(&render::render_message(message));
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

pub async fn run_single_prompt(
    settings: &Settings,
    snapshots: Arc<dyn SnapshotStore>,
    prompt: &str,
) -> Result<()> {
    let mut app = App::open(settings, snapshots)?;
    let mut out = String::new();
    app.handle_line(prompt, &mut out).await?;
    print!("{out}");
    Ok(())
}

pub async fn run_repl(settings: &Settings, snapshots: Arc<dyn SnapshotStore>) -> Result<()> {
    let mut app = App::open(settings, snapshots)?;

    println!("NavGPT - type /help for commands, /quit to exit.");
    let mut out = String::new();
    app.show_current(&mut out);
    print!("{out}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let mut out = String::new();
        match app.handle_line(&line, &mut out).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => print!("{out}"),
            Err(e) => {
                print!("{out}");
                match e.downcast_ref::<NavError>() {
                    Some(NavError::ConversationNotFound(id)) => {
                        eprintln!("Conversation not found: {id}")
                    }
                    _ => eprintln!("Error: {e}"),
                }
            }
        }
    }

    Ok(())
}

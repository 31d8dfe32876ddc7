//! Plain-text rendering of conversations for the terminal.

use chrono::{Local, NaiveDate, TimeZone};
use navgpt_core::{
    segments, ConversationSummary, Message, RecencyGroup, Role, Segment, UserPreferences,
};

const ASSISTANT_NAME: &str = "NavGPT";

/// Render an assistant reply: prose verbatim, steps numbered, code framed.
pub fn render_reply(text: &str) -> String {
    let mut out = String::new();

    for segment in segments(text) {
        match segment {
            Segment::Prose(prose) => {
                out.push_str(prose.trim_matches('\n'));
                out.push('\n');
            }
            Segment::Steps { preamble, steps } => {
                let preamble = preamble.trim();
                if !preamble.is_empty() {
                    out.push_str(preamble);
                    out.push('\n');
                }
                for step in steps {
                    out.push_str(&format!("  {}. {}\n", step.number, step.content));
                }
            }
            Segment::Code(block) => {
                out.push_str(&format!("┌─ {}\n", block.language));
                for line in block.code.lines() {
                    out.push_str(&format!("│ {line}\n"));
                }
                out.push_str("└─\n");
            }
        }
    }

    out
}

pub fn render_message(message: &Message) -> String {
    match message.role {
        Role::User => format!("You:\n{}\n", message.content),
        Role::Assistant => format!("{ASSISTANT_NAME}:\n{}", render_reply(&message.content)),
    }
}

/// Render the conversation list, marking the current conversation with `*`.
pub fn render_conversation_list(
    groups: &[(RecencyGroup, Vec<ConversationSummary>)],
    current: Option<&str>,
) -> String {
    if groups.is_empty() {
        return "No chats yet\n".to_string();
    }

    let mut out = String::new();
    for (group, items) in groups {
        out.push_str(group.label());
        out.push('\n');
        for item in items {
            let marker = if Some(item.id.as_str()) == current { '*' } else { ' ' };
            out.push_str(&format!(
                " {marker} {}  {} ({} messages, {})\n",
                short_id(&item.id),
                item.title,
                item.message_count,
                format_time(item.created_at)
            ));
        }
    }
    out
}

pub fn render_preferences(prefs: &UserPreferences) -> String {
    format!(
        "User id:       {}\nTheme:         {:?}\nFont size:     {:?}\nNotifications: {}\n",
        prefs.user_id,
        prefs.theme,
        prefs.font_size,
        if prefs.notifications { "on" } else { "off" }
    )
}

/// First eight characters of an id, enough to address it with `/switch`.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn format_time(created_at_ms: i64) -> String {
    match Local.timestamp_millis_opt(created_at_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown time".to_string(),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::conversation::{Conversation, ConversationSummary, Message};
use super::recency::RecencyGroup;
use crate::error::{NavError, Result};
use crate::storage::{read_snapshot, write_snapshot, SnapshotStore};

/// Snapshot key for the conversation collection of one user namespace.
pub fn chat_store_key(namespace: &str) -> String {
    format!("navs-gpt-chat-store-{}", namespace)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatState {
    #[serde(default)]
    chats: HashMap<String, Conversation>,
    #[serde(default)]
    current_chat: Option<String>,
}

/// The conversation collection plus the "current" pointer.
///
/// Every successful mutation is flushed to the snapshot store before the
/// call returns. Lookups on unknown ids never modify state.
pub struct SessionStore {
    snapshots: Arc<dyn SnapshotStore>,
    key: String,
    state: ChatState,
    last_created_at: i64,
}

impl SessionStore {
    /// Load the collection for `namespace`. A missing or corrupt snapshot
    /// yields an empty collection.
    pub fn open(snapshots: Arc<dyn SnapshotStore>, namespace: &str) -> Self {
        let key = chat_store_key(namespace);
        let mut state: ChatState = read_snapshot(snapshots.as_ref(), &key).unwrap_or_default();

        // A dangling pointer would violate the "current exists" invariant.
        if let Some(ref current) = state.current_chat {
            if !state.chats.contains_key(current) {
                tracing::warn!("Dropping dangling current conversation {current}");
                state.current_chat = None;
            }
        }

        let last_created_at = state
            .chats
            .values()
            .map(|c| c.created_at)
            .max()
            .unwrap_or(i64::MIN);

        Self {
            snapshots,
            key,
            state,
            last_created_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.state.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.chats.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.chats.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.state.chats.get(id)
    }

    pub fn messages(&self, id: &str) -> Option<&[Message]> {
        self.state.chats.get(id).map(|c| c.messages.as_slice())
    }

    pub fn current_id(&self) -> Option<&str> {
        self.state.current_chat.as_deref()
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.current_id().and_then(|id| self.state.chats.get(id))
    }

    /// Generate a unique conversation id
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Insert an empty conversation and make it current.
    pub fn create_conversation(&mut self) -> Result<String> {
        let mut id = Self::generate_id();
        while self.state.chats.contains_key(&id) {
            id = Self::generate_id();
        }

        // Creation times stay strictly increasing so listings are stable.
        let created_at = Utc::now().timestamp_millis().max(self.last_created_at.saturating_add(1));
        self.last_created_at = created_at;

        self.state.chats.insert(id.clone(), Conversation::new(created_at));
        self.state.current_chat = Some(id.clone());
        tracing::debug!("Created conversation {id}");
        self.flush()?;
        Ok(id)
    }

    pub fn select_conversation(&mut self, id: &str) -> Result<()> {
        if !self.state.chats.contains_key(id) {
            return Err(NavError::ConversationNotFound(id.to_string()));
        }
        if self.current_id() == Some(id) {
            return Ok(());
        }
        self.state.current_chat = Some(id.to_string());
        self.flush()
    }

    pub fn append_message(&mut self, id: &str, message: Message) -> Result<()> {
        let conversation = self
            .state
            .chats
            .get_mut(id)
            .ok_or_else(|| NavError::ConversationNotFound(id.to_string()))?;
        conversation.messages.push(message);
        self.flush()
    }

    /// Returns `Ok(false)` when the title is already `title`.
    pub fn rename_conversation(&mut self, id: &str, title: &str) -> Result<bool> {
        let conversation = self
            .state
            .chats
            .get_mut(id)
            .ok_or_else(|| NavError::ConversationNotFound(id.to_string()))?;
        if conversation.title == title {
            return Ok(false);
        }
        conversation.title = title.to_string();
        self.flush()?;
        Ok(true)
    }

    /// Remove a conversation. Deleting the current one clears the pointer;
    /// choosing a replacement is up to the caller.
    pub fn delete_conversation(&mut self, id: &str) -> Result<bool> {
        if self.state.chats.remove(id).is_none() {
            return Ok(false);
        }
        if self.current_id() == Some(id) {
            self.state.current_chat = None;
        }
        tracing::debug!("Deleted conversation {id}");
        self.flush()?;
        Ok(true)
    }

    /// Make sure a current conversation exists, creating one when the
    /// collection is empty or nothing is selected.
    pub fn ensure_current(&mut self) -> Result<String> {
        match self.state.current_chat.clone() {
            Some(id) if !self.state.chats.is_empty() => Ok(id),
            _ => self.create_conversation(),
        }
    }

    /// All conversations, newest first.
    pub fn list(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .state
            .chats
            .iter()
            .map(|(id, c)| ConversationSummary {
                id: id.clone(),
                title: c.display_title().to_string(),
                created_at: c.created_at,
                message_count: c.messages.len(),
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        summaries
    }

    /// Conversations bucketed by creation day, newest first within each
    /// bucket. Empty buckets are omitted.
    pub fn grouped(&self, today: NaiveDate) -> Vec<(RecencyGroup, Vec<ConversationSummary>)> {
        let mut buckets: HashMap<RecencyGroup, Vec<ConversationSummary>> = HashMap::new();
        for summary in self.list() {
            let group = RecencyGroup::for_timestamp(summary.created_at, today);
            buckets.entry(group).or_default().push(summary);
        }

        RecencyGroup::ALL
            .iter()
            .filter_map(|group| buckets.remove(group).map(|items| (*group, items)))
            .collect()
    }

    fn flush(&self) -> Result<()> {
        write_snapshot(self.snapshots.as_ref(), &self.key, &self.state)
    }
}

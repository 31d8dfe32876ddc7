use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::storage::{read_snapshot, write_snapshot, SnapshotStore};

/// Snapshot key holding the user preferences.
pub const PREFERENCES_KEY: &str = "navs-gpt-user-store";
/// Namespace used when no user id can be read.
pub const DEFAULT_NAMESPACE: &str = "default-user";

const USER_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const USER_ID_LEN: usize = 26;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {other}")),
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(format!("Unknown font size: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Empty when a stored snapshot lacks an id; [`PreferencesStore::load`]
    /// fills it in.
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_notifications() -> bool {
    true
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            user_id: generate_user_id(),
            theme: Theme::default(),
            font_size: FontSize::default(),
            notifications: default_notifications(),
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub user_id: Option<String>,
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
    pub notifications: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PreferencesState {
    preferences: UserPreferences,
}

/// Random lowercase alphanumeric token.
pub fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    (0..USER_ID_LEN)
        .map(|_| USER_ID_ALPHABET[rng.gen_range(0..USER_ID_ALPHABET.len())] as char)
        .collect()
}

/// Read the chat namespace (the stored user id) straight from the
/// preferences snapshot without going through [`PreferencesStore`].
pub fn chat_namespace(snapshots: &dyn SnapshotStore) -> String {
    stored_user_id(snapshots).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

/// The non-empty `userId` of the preferences snapshot, if one can be read,
/// regardless of whether the rest of the snapshot decodes.
fn stored_user_id(snapshots: &dyn SnapshotStore) -> Option<String> {
    let raw = match snapshots.get(PREFERENCES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Error accessing user store: {e}");
            return None;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Error accessing user store: {e}");
            return None;
        }
    };

    value
        .pointer("/state/preferences/userId")
        .and_then(|v| v.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Persisted user preferences.
pub struct PreferencesStore {
    snapshots: Arc<dyn SnapshotStore>,
    preferences: UserPreferences,
}

impl PreferencesStore {
    /// Load preferences. Missing fields take their defaults. A missing or
    /// undecodable snapshot is replaced with defaults, keeping any user id
    /// that can still be read so the chat namespace does not move.
    pub fn load(snapshots: Arc<dyn SnapshotStore>) -> Result<Self> {
        let loaded = read_snapshot::<PreferencesState>(snapshots.as_ref(), PREFERENCES_KEY);
        let (mut preferences, mut dirty) = match loaded {
            Some(state) => (state.preferences, false),
            None => (UserPreferences::default(), true),
        };

        if dirty || preferences.user_id.is_empty() {
            preferences.user_id =
                stored_user_id(snapshots.as_ref()).unwrap_or_else(generate_user_id);
            dirty = true;
        }

        let store = Self {
            snapshots,
            preferences,
        };
        if dirty {
            store.flush()?;
        }
        Ok(store)
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn user_id(&self) -> &str {
        &self.preferences.user_id
    }

    pub fn update(&mut self, update: PreferencesUpdate) -> Result<()> {
        if let Some(user_id) = update.user_id {
            self.preferences.user_id = user_id;
        }
        if let Some(theme) = update.theme {
            self.preferences.theme = theme;
        }
        if let Some(font_size) = update.font_size {
            self.preferences.font_size = font_size;
        }
        if let Some(notifications) = update.notifications {
            self.preferences.notifications = notifications;
        }
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let state = PreferencesState {
            preferences: self.preferences.clone(),
        };
        write_snapshot(self.snapshots.as_ref(), PREFERENCES_KEY, &state)
    }
}

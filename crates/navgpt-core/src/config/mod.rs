use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::NavError;

pub const DEFAULT_BASE_URL: &str = "https://gpt.navsharma.com";
pub const DEFAULT_PROMPT_PATH: &str = "/prompt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub relay: RelaySettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub base_url: String,
    pub prompt_path: String,
    /// Attach the stored user id as the `userId` query parameter.
    pub send_user_id: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    pub data_dir: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            prompt_path: DEFAULT_PROMPT_PATH.to_string(),
            send_user_id: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            relay: RelaySettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("navgpt")
            .join("config.toml")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unparsable.
    pub fn load_from(path: &std::path::Path) -> Self {
        Self::try_load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config {}: {e}", path.display());
            Self::default()
        })
    }

    /// Like [`Settings::load_from`], but hands a read or parse failure back to
    /// the caller. A missing file still yields the defaults.
    pub fn try_load_from(path: &std::path::Path) -> Result<Self, NavError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), NavError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), NavError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the persisted snapshots.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("navgpt")
        })
    }

    /// Full URL of the prompt endpoint.
    pub fn prompt_url(&self) -> String {
        format!(
            "{}/{}",
            self.relay.base_url.trim_end_matches('/'),
            self.relay.prompt_path.trim_start_matches('/')
        )
    }
}

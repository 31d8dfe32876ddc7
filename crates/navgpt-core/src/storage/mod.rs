//! Durable key-value snapshots.
//!
//! Each persisted store (preferences, conversations) is written as a single
//! JSON document under one key, wrapped in a [`Snapshot`] envelope.

mod file;
mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Backing storage for whole-document snapshots.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Envelope written around every persisted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

impl<T> Snapshot<T> {
    pub fn new(state: T) -> Self {
        Self { state, version: 0 }
    }
}

/// Read and decode the snapshot under `key`.
///
/// Missing keys, unreadable storage and undecodable documents all yield
/// `None`; the caller falls back to its in-memory default.
pub fn read_snapshot<T: DeserializeOwned>(store: &dyn SnapshotStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read snapshot {key}: {e}");
            return None;
        }
    };

    match serde_json::from_str::<Snapshot<T>>(&raw) {
        Ok(snapshot) => Some(snapshot.state),
        Err(e) => {
            tracing::warn!("Discarding corrupt snapshot {key}: {e}");
            None
        }
    }
}

pub fn write_snapshot<T: Serialize>(store: &dyn SnapshotStore, key: &str, state: &T) -> Result<()> {
    let raw = serde_json::to_string(&Snapshot::new(state))?;
    tracing::debug!("Persisting snapshot {key} ({} bytes)", raw.len());
    store.set(key, &raw)
}

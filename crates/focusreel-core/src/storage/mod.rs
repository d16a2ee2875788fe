mod config;
pub mod database;

pub use config::{Config, PlayerConfig, SessionConfig};
pub use database::Database;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, `~/.config/focusreel[-dev]/`.
///
/// Set FOCUSREEL_ENV=dev to use the development data directory, or
/// FOCUSREEL_DATA_DIR to point somewhere else entirely (used by the E2E
/// tests to isolate state).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = if let Ok(explicit) = std::env::var("FOCUSREEL_DATA_DIR") {
        PathBuf::from(explicit)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("FOCUSREEL_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("focusreel-dev")
        } else {
            base_dir.join("focusreel")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Persistence port for the local key-value store.
///
/// Values are opaque JSON-encoded strings. Every component takes the store
/// by reference, so tests substitute [`MemoryStore`] for the SQLite-backed
/// [`Database`].
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// All entries whose key starts with `prefix`, ordered by key.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError>;
}

/// In-memory key-value store.
///
/// The substitute backend for tests; shares the exact contract of
/// [`Database`] without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StorageError> {
        Ok(self
            .entries
            .borrow()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

//! Client-side durable storage
//!
//! A small key-value blob store, modelled on the browser's local storage:
//! string keys, string values, last writer wins. The typed
//! [`LocationStore`](location::LocationStore) sits on top of it and is the
//! only code that knows about the persisted location record.
//!
//! Stored in the XDG data directory (~/.local/share/solarscope/storage.json)
//! unless `storage.path` is configured.

pub mod location;

pub use location::{LocationStore, SelectedLocation};

use crate::config::defaults::APP_DIR_NAME;
use crate::config::Config;
use crate::constants::storage::STORAGE_FILE_NAME;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// String key-value storage
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// JSON-file backed store
///
/// Every operation goes to disk so that separate processes see each other's
/// writes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Storage("Could not determine data directory".to_string()))
    }

    /// Open the store configured in `[storage]`, or the default location
    pub fn open(config: &Config) -> Result<Self> {
        let path = match &config.storage.path {
            Some(path) => path.clone(),
            None => Self::data_dir()?.join(STORAGE_FILE_NAME),
        };
        Ok(Self::at(path))
    }

    /// Open a store at a specific path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; None when there is nothing stored yet
    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::Storage(format!("Failed to read storage file: {}", e))
        })?;

        Ok(Some(content).filter(|c| !c.trim().is_empty()))
    }

    fn parse(content: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(content).map_err(|e| {
            Error::Storage(format!("Failed to parse storage file: {}", e))
        })
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw()? {
            Some(content) => Self::parse(&content),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Sibling path with `suffix` appended to the file name
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Move an unparsable file out of the way so writes can continue
    fn quarantine(&self) -> Result<PathBuf> {
        let aside = self.sibling(".corrupt");
        fs::rename(&self.path, &aside).map_err(|e| {
            Error::Storage(format!("Failed to move aside corrupt storage file: {}", e))
        })?;
        Ok(aside)
    }

    /// Replace the file in one rename so readers never see a partial write
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(entries).map_err(|e| {
            Error::Storage(format!("Failed to serialize storage: {}", e))
        })?;

        let tmp = self.sibling(".tmp");
        fs::write(&tmp, content).map_err(|e| {
            Error::Storage(format!("Failed to write storage file: {}", e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Storage(format!("Failed to replace storage file: {}", e))
        })
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| Error::Storage("Storage lock poisoned".to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| Error::Storage("Storage lock poisoned".to_string()))?;
        let parsed = self.read_raw()?.map(|content| Self::parse(&content));
        let mut entries = match parsed {
            Some(Ok(entries)) => entries,
            Some(Err(e)) => {
                let aside = self.quarantine()?;
                warn!(error = %e, moved_to = %aside.display(), "Discarding unreadable storage file");
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| Error::Storage("Storage lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| Error::Storage("Storage lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use newsdesk_logging::desk_debug;

use crate::persist::{file_version, read_versioned, AtomicFileWriter, FileVersion, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage file error: {0}")]
    File(#[from] PersistError),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A key-value text store shared with other writers.
///
/// Writers do not coordinate: the last write wins, and
/// [`Storage::take_external_change`] tells a reader its copy is stale.
pub trait Storage {
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Whether someone else changed `key` since this handle last read or
    /// wrote it. Acknowledges the change.
    fn take_external_change(&mut self, key: &str) -> Result<bool, StorageError>;
}

/// One `{key}.json` file per key under a data directory.
#[derive(Debug)]
pub struct FileStorage {
    writer: AtomicFileWriter,
    /// Version of each key's file the last time this handle read or wrote it.
    seen: HashMap<String, Option<FileVersion>>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.into()),
            seen: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        Ok(self.dir().join(file_name(key)?))
    }
}

impl Storage for FileStorage {
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let (value, version) = match read_versioned(&path)? {
            Some((text, version)) => (Some(text), Some(version)),
            None => (None, None),
        };
        self.seen.insert(key.to_string(), version);
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let (_, version) = self.writer.write(&file_name(key)?, value)?;
        self.seen.insert(key.to_string(), Some(version));
        Ok(())
    }

    fn take_external_change(&mut self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        let current = file_version(&path)?;
        let previous = self.seen.insert(key.to_string(), current);
        let changed = match previous {
            Some(previous) => previous != current,
            // Never touched by this handle: only a file that appeared counts.
            None => current.is_some(),
        };
        if changed {
            desk_debug!("External change detected for {:?}", path);
        }
        Ok(changed)
    }
}

fn file_name(key: &str) -> Result<String, StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(format!("{key}.json"))
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    revision: u64,
}

/// In-process storage. Clones share the data but track their own view of
/// it, which makes each clone behave like a separate window.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    shared: Arc<Mutex<HashMap<String, Entry>>>,
    seen: HashMap<String, u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, StorageError> {
        self.shared
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl Storage for MemoryStorage {
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = self.lock()?.get(key).cloned();
        let revision = entry.as_ref().map_or(0, |entry| entry.revision);
        self.seen.insert(key.to_string(), revision);
        Ok(entry.map(|entry| entry.value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let revision = {
            let mut map = self.lock()?;
            let revision = map.get(key).map_or(0, |entry| entry.revision) + 1;
            map.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    revision,
                },
            );
            revision
        };
        self.seen.insert(key.to_string(), revision);
        Ok(())
    }

    fn take_external_change(&mut self, key: &str) -> Result<bool, StorageError> {
        let current = self.lock()?.get(key).map_or(0, |entry| entry.revision);
        let previous = self.seen.insert(key.to_string(), current).unwrap_or(0);
        Ok(previous != current)
    }
}

//! Key-value backends for the stats record.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::StorageError;

/// Directory name under the platform data dir.
const APP_DIR_NAME: &str = "pomodoro-widget";

/// A key-value store holding text records.
pub trait StatsStorage {
    /// Reads the value stored under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: StatsStorage + ?Sized> StatsStorage for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Opens the stats storage under `data_dir`, or under the platform default.
///
/// Never fails: when no location can be determined the counters live in
/// memory for this run.
pub fn open_storage(data_dir: Option<&Path>) -> Box<dyn StatsStorage> {
    let location = match data_dir {
        Some(dir) => Ok(FileStorage::new(dir)),
        None => FileStorage::default_location(),
    };
    storage_or_memory(location)
}

/// Uses the resolved file storage, or falls back to [`MemoryStorage`].
pub fn storage_or_memory(location: Result<FileStorage, StorageError>) -> Box<dyn StatsStorage> {
    match location {
        Ok(storage) => {
            debug!(dir = %storage.dir().display(), "using stats directory");
            Box::new(storage)
        }
        Err(e) => {
            warn!(error = %e, "stats will not be saved this session");
            Box::new(MemoryStorage::new())
        }
    }
}

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-memory storage, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
    write_calls: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.into(), value.into());
        storage
    }

    /// Makes every subsequent write fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.write_calls
    }
}

impl StatsStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_calls += 1;
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// FileStorage
// ============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `pomodoro-widget` under the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DataDirNotFound` if the platform has no
    /// data directory for the current user.
    pub fn default_location() -> Result<Self, StorageError> {
        let base = dirs::data_dir().ok_or(StorageError::DataDirNotFound)?;
        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StatsStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no stats record on disk");
                Ok(None)
            }
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&tmp, value))
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::Write { path, source });
        }

        debug!(path = %path.display(), "stats record written");
        Ok(())
    }
}

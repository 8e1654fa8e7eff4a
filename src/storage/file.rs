//! File-backed key-value store

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::{debug, warn};

use super::{KeyValueError, KeyValueStore};

/// Key-value store persisted as a single JSON object on disk.
///
/// Every operation re-reads the file, so two handles on the same path observe
/// each other's writes. There is no locking across processes; the last writer
/// wins.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open a store at `path`. The file is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(error) => {
                warn!(path = %self.path.display(), "failed to read storage file: {error}");

                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|error| {
            warn!(path = %self.path.display(), "ignoring malformed storage file: {error}");

            BTreeMap::new()
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), KeyValueError> {
        let encoded = serde_json::to_string_pretty(entries)?;
        let staging = self.path.with_extension("tmp");

        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), "persisted storage file");

        Ok(())
    }

    fn modify(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), KeyValueError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = self.load();

        change(&mut entries);

        self.persist(&entries)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

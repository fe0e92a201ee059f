//! File-backed key-value store
//!
//! All entries live in a single JSON object file (`store.json` in the data
//! directory). Every write rewrites the file atomically: write to a temp
//! file, sync it, then rename over the target, so the store is never left
//! half-written.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{KeyValueStore, StoreError, StoreResult};
use crate::config::Config;

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) a store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open the store configured for this installation
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the store file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_entries(&self) -> StoreResult<Entries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(StoreError::PermissionDenied {
                    path: self.path.clone(),
                    source: e,
                })
            }
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::InvalidFormat {
            path: self.path.clone(),
            details: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &Entries) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::InvalidFormat {
            path: self.path.clone(),
            details: e.to_string(),
        })?;
        atomic_write(&self.path, &json)
    }

    fn update<F>(&self, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_entries()?;
        if f(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!("Storing key {} in {:?}", key, self.path);
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory (owner-only on unix)
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::from_io(e, parent.to_path_buf()))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        create_private(&temp_path).map_err(|e| StoreError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Create (or truncate) a file readable only by its owner
///
/// The store holds the access token in plain text.
#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::fs::{OpenOptions, Permissions};
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; a leftover temp file keeps its bits
    file.set_permissions(Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    File::create(path)
}

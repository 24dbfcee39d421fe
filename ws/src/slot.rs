//! Durable key-value slots
//!
//! A slot is a single string value under a string key that outlives the
//! process. The store only needs get-by-key and set-by-key.

use fs2::FileExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::SlotError;

/// Synchronous string-keyed storage the store mirrors into
pub trait DurableSlot {
    /// Read the value under `key`, `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Overwrite the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), SlotError>;
}

/// In-process slot map. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot map with `key` already holding `value`
    pub fn with_value(key: &str, value: &str) -> Self {
        let slot = Self::new();
        slot.values.borrow_mut().insert(key.to_string(), value.to_string());
        slot
    }
}

impl DurableSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory of slot files, one `{key}.json` per key
#[derive(Debug, Clone)]
pub struct FileSlot {
    base_path: PathBuf,
}

impl FileSlot {
    /// Open or create a slot directory at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SlotError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|source| SlotError::Unavailable {
            path: base_path.clone(),
            source,
        })?;
        debug!(?base_path, "Opened slot directory");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SlotError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.lock", key))
    }
}

impl DurableSlot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SlotError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.path_for(key)?;
        let write_err = |source| SlotError::Write {
            key: key.to_string(),
            source,
        };

        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key))
            .map_err(write_err)?;
        lock_file.lock_exclusive().map_err(write_err)?;

        let result = write_replace(&self.base_path, &path, value);
        // Closing the handle releases the lock
        drop(lock_file);
        result.map_err(write_err)?;

        debug!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}

/// Write beside the target and rename over it so readers never see a partial value
fn write_replace(dir: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn validate_key(key: &str) -> Result<(), SlotError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(SlotError::InvalidKey(key.to_string()))
    }
}

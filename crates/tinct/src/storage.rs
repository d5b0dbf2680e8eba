//! Key-value persistence backends.
//!
//! [`Storage`] is the seam between the override model and wherever values
//! actually live. Backends report failures as [`StorageError`]; the
//! [`OverrideStore`](crate::overrides::OverrideStore) decides what to do with
//! them (it swallows them), so nothing here ever reaches the color math.

use std::collections::HashMap;
use std::io;
#[cfg(feature = "native")]
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A string key-value store.
pub trait Storage {
    /// Returns the value for `key`, or `None` if it was never set.
    ///
    /// # Errors
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    /// Returns `StorageError` if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    /// Returns `StorageError` if the backend rejects the removal.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Error from a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded writing '{key}'")]
    QuotaExceeded { key: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// In-process storage.
///
/// Can be configured to fail every call ([`MemoryStorage::unavailable`]) or
/// to reject writes beyond a byte budget ([`MemoryStorage::with_quota`]),
/// which mirrors how browser storage misbehaves in private modes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStorage {
    /// Creates an empty, working store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that fails every operation.
    pub fn unavailable() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Limits the total size (keys plus values, in bytes) this store accepts.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Unavailable("storage is disabled".into()));
        }
        Ok(())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        let needed = self.used_bytes_without(key) + key.len() + value.len();
        if self.quota.is_some_and(|quota| needed > quota) {
            return Err(StorageError::QuotaExceeded { key: key.to_string() });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by one file per key inside a directory.
///
/// Keys are mapped to file names by replacing anything outside
/// `[A-Za-z0-9._-]` with `_`. The directory is created on first write.
///
/// # Availability
/// This type is only available with the `native` feature.
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

#[cfg(feature = "native")]
impl FileStorage {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform data directory for tinct, if one can be determined.
    pub fn default_location() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "tinct", "tinct").map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(name)
    }
}

#[cfg(feature = "native")]
impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_set_get_remove() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get("k").expect("get"), None);

        store.set("k", "v").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.remove("k").expect("remove");
        assert!(store.is_empty());
        store.remove("k").expect("removing a missing key is fine");
    }

    #[test]
    fn memory_unavailable_fails_everything() {
        let mut store = MemoryStorage::unavailable();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(store.set("k", "v").is_err());
        assert!(store.remove("k").is_err());
    }

    #[test]
    fn memory_quota_rejects_oversized_writes() {
        let mut store = MemoryStorage::new().with_quota(10);
        store.set("ab", "cdef").expect("6 bytes fits");
        // Overwriting the same key only counts the new value.
        store.set("ab", "cdefghij").expect("10 bytes fits");
        let err = store.set("x", "y").expect_err("12 bytes does not fit");
        assert!(matches!(err, StorageError::QuotaExceeded { ref key } if key == "x"));
        assert_eq!(store.get("ab").expect("get").as_deref(), Some("cdefghij"));
    }

    #[test]
    fn boxed_storage_delegates() {
        let mut store: Box<dyn Storage> = Box::new(MemoryStorage::new());
        store.set("k", "v").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
    }

    #[cfg(feature = "native")]
    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStorage::new(dir.path().join("nested"));

        assert_eq!(store.get("theme-overrides:dark").expect("get"), None);
        store.set("theme-overrides:dark", "{}").expect("set");
        assert!(dir.path().join("nested").join("theme-overrides_dark").exists());
        assert_eq!(
            store.get("theme-overrides:dark").expect("get").as_deref(),
            Some("{}")
        );

        store.remove("theme-overrides:dark").expect("remove");
        store.remove("theme-overrides:dark").expect("remove twice");
        assert_eq!(store.get("theme-overrides:dark").expect("get"), None);
    }
}

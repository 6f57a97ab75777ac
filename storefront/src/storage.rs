//! File-backed key-value storage.
//!
//! One JSON file per key under a data directory. Writes go to a temporary
//! sibling first and are renamed into place, so a crash mid-write leaves the
//! previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use ticket_booth_core::environment::{KeyValueStorage, StorageError};

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the data directory
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::Unavailable(format!("cannot create {}: {e}", dir.display()))
        })?;

        tracing::debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// The data directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        let write_error = |e: std::io::Error| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        };

        fs::write(&staging, value).map_err(write_error)?;
        fs::rename(&staging, &path).map_err(write_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.get("lb_cart_v1"), Ok(None));
        assert_eq!(storage.remove("lb_cart_v1"), Ok(()));
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();

        storage.set("lb_cart_v1", "[]").unwrap();
        storage.set("lb_cart_v1", "[1,2]").unwrap();

        assert_eq!(storage.get("lb_cart_v1").unwrap().as_deref(), Some("[1,2]"));
        assert!(storage.dir().join("lb_cart_v1.json").exists());
        assert!(!storage.dir().join("lb_cart_v1.json.tmp").exists());
    }

    #[test]
    fn test_keys_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("../outside", "{}").unwrap();

        assert!(storage.dir().join("___outside.json").exists());
        assert_eq!(storage.get("../outside").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("lb_user_v1", "{}").unwrap();
        storage.remove("lb_user_v1").unwrap();

        assert_eq!(storage.get("lb_user_v1"), Ok(None));
    }
}

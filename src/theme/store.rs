//! JSON key-value file store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from the settings store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String values persisted as one JSON object
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value and write the file
    ///
    /// The in-memory value only changes once the write succeeded.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StoreError> {
        let mut next = self.values.clone();
        next.insert(key.into(), value.into());
        self.flush(&next)?;
        self.values = next;
        Ok(())
    }

    /// Remove a value and write the file
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        if !self.values.contains_key(key) {
            return Ok(None);
        }

        let mut next = self.values.clone();
        let removed = next.remove(key);
        self.flush(&next)?;
        self.values = next;
        Ok(removed)
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(values).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        // Readers only ever see a complete file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_set_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("theme", "dark").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("theme"), Some("dark"));

        let mut reopened = reopened;
        assert_eq!(reopened.remove("theme").unwrap(), Some("dark".to_string()));
        assert_eq!(FileStore::open(&path).unwrap().get("theme"), None);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_failed_write_keeps_previous_values() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        let path = sub.join("settings.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("theme", "light").unwrap();

        // A plain file where the directory used to be makes every write fail
        std::fs::remove_dir_all(&sub).unwrap();
        std::fs::write(&sub, "in the way").unwrap();

        assert!(matches!(store.set("theme", "dark"), Err(StoreError::Io { .. })));
        assert_eq!(store.get("theme"), Some("light"));

        assert!(store.remove("theme").is_err());
        assert_eq!(store.get("theme"), Some("light"));
    }
}

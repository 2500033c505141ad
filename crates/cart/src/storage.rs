//! Key-value storage port for the cart.
//!
//! The cart only needs string values under string keys, read once at
//! startup and written after every mutation. Adapters:
//!
//! - `MemoryStore`: process-local map, for tests and embedding
//! - `FileStore`: one JSON file per key in a directory, for the CLI
//!
//! A store may be shared by several carts (`Arc<S>` is itself a store), which
//! models several tabs of one origin: the last write wins.

use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Synchronous string key-value storage.
///
/// Methods take `&self` so one store can back several carts at once.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: key `cart` lives in `<dir>/cart.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys map to file names, so only `[A-Za-z0-9_.-]` is allowed and the
    /// key may not start with a dot.
    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temporary sibling, then renames over the target so a
    /// reader never sees a half-written value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart").unwrap(), None);

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_shared_memory_store() {
        let store = Arc::new(MemoryStore::new());
        let other = Arc::clone(&store);
        store.set("cart", "first").unwrap();
        other.set("cart", "second").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).unwrap();

        assert_eq!(store.get("cart").unwrap(), None);
        store.set("cart", r#"{"version":1,"lines":[]}"#).unwrap();
        assert!(store.dir().join("cart.json").exists());
        assert_eq!(
            store.get("cart").unwrap().as_deref(),
            Some(r#"{"version":1,"lines":[]}"#)
        );
        assert!(!store.dir().join("cart.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(matches!(
                store.set(key, "x").unwrap_err(),
                StorageError::InvalidKey(_)
            ));
        }
    }
}

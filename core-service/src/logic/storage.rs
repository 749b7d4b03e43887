//! Key-Value Storage
//!
//! Durable blobs keyed by name. One JSON file per key, written atomically
//! (temp file in the same directory, then rename).

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GuardianError, GuardianResult};

/// Durable key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> GuardianResult<Option<Vec<u8>>>;
    /// Replace the value as a whole; readers never see a partial write
    fn put(&self, key: &str, value: &[u8]) -> GuardianResult<()>;
    fn remove(&self, key: &str) -> GuardianResult<()>;
}

// ============================================================================
// FILE STORE
// ============================================================================

pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn open(base_dir: &Path) -> GuardianResult<Self> {
        fs::create_dir_all(base_dir)?;
        log::info!("Storage directory: {}", base_dir.display());
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> GuardianResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> GuardianResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.base_dir)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| GuardianError::Io(e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> GuardianResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Non-durable store for tests and ephemeral hosts
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> GuardianResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> GuardianResult<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> GuardianResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// ============================================================================
// JSON HELPERS
// ============================================================================

/// Decode the blob under `key`, falling back to the default when it is
/// missing, unreadable or corrupt. Never fails.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let data = match store.get(key) {
        Ok(Some(data)) => data,
        Ok(None) => return T::default(),
        Err(e) => {
            log::warn!("Failed to read '{}': {} - using empty default", key, e);
            return T::default();
        }
    };

    match serde_json::from_slice(&data) {
        Ok(value) => value,
        Err(e) => {
            let err = GuardianError::PersistenceCorrupt {
                key: key.to_string(),
                reason: e.to_string(),
            };
            log::warn!("{} - using empty default", err);
            T::default()
        }
    }
}

/// Serialize the full value and replace the blob under `key`
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> GuardianResult<()> {
    let json = serde_json::to_vec(value)?;
    store.put(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_file_store_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.get("missing").unwrap().is_none());

        store.put("k", b"[1,2,3]").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"[1,2,3]");

        store.put("k", b"[4]").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"[4]");

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_put_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.put("a", b"{}").unwrap();
        store.put("b", b"{}").unwrap();

        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_corrupt_blob_loads_default() {
        let store = MemoryStore::new();
        store.put("set", b"{not json").unwrap();

        let loaded: BTreeSet<String> = load_or_default(&store, "set");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let set: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();
        save_json(&store, "set", &set).unwrap();

        let loaded: BTreeSet<String> = load_or_default(&store, "set");
        assert_eq!(loaded, set);
    }
}

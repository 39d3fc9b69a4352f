//! Per-device key/value persistence.
//!
//! Every record the diary keeps (session, saved profiles, account table and
//! one review collection per user) lives under a namespaced key. `FileStore`
//! writes one JSON document per key; `MemoryStore` backs tests.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

pub const KEY_PREFIX: &str = "cinenote";
pub const SESSION_KEY: &str = "cinenote_session";
pub const SAVED_ACCOUNTS_KEY: &str = "cinenote_saved_accounts";
pub const USERS_KEY: &str = "cinenote_users";

pub fn reviews_key(user_id: &str) -> String {
    format!("{}_reviews_{}", KEY_PREFIX, user_id)
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Read and decode a JSON record. Unreadable JSON counts as absent.
pub fn read_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        debug!("Store miss: {}", key);
        return Ok(None);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Corrupt record detected for {}: {}. Treating as empty.", key, e);
            Ok(None)
        }
    }
}

pub fn write_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// One `<key>.json` file per record, replaced atomically on every write
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Remove every record. Used by `clear --all`.
    pub fn clear(&self) -> Result<(), StorageError> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Io { key: key.to_string(), source })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write to a sibling temp file, then rename over the record
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)
            .and_then(|()| std::fs::rename(&temp_path, &path))
            .map_err(|source| {
                warn!("Failed to write store file for {}: {}", key, source);
                StorageError::Io { key: key.to_string(), source }
            })?;
        debug!("Store saved: {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { key: key.to_string(), source }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StorageError::Io {
            key: self.dir.display().to_string(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip_and_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store")).unwrap();

        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        store.set(SESSION_KEY, "{\"id\":\"u1\"}").unwrap();
        store.set(&reviews_key("u1"), "[]").unwrap();

        assert_eq!(store.get(SESSION_KEY).unwrap().as_deref(), Some("{\"id\":\"u1\"}"));
        assert_eq!(store.keys().unwrap(), vec!["cinenote_reviews_u1".to_string(), SESSION_KEY.to_string()]);

        store.remove(SESSION_KEY).unwrap();
        store.remove(SESSION_KEY).unwrap();
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_interrupted_write_keeps_previous_record() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let key = reviews_key("u1");
        store.set(&key, r#"[{"title":"A"},{"title":"B"},{"title":"C"}]"#).unwrap();

        // A crash between writing the temp file and renaming it leaves a torn temp file behind
        let torn = dir.path().join(format!("{}.json.tmp", key));
        std::fs::write(&torn, r#"[{"title":"A"},{"ti"#).unwrap();

        let reopened = FileStore::new(dir.path().to_path_buf()).unwrap();
        let records: Option<Vec<serde_json::Value>> = read_json(&reopened, &key).unwrap();
        assert_eq!(records.map(|r| r.len()), Some(3));
        assert_eq!(reopened.keys().unwrap(), vec![key.clone()]);

        reopened.set(&key, r#"[{"title":"D"},{"title":"A"},{"title":"B"},{"title":"C"}]"#).unwrap();
        let records: Option<Vec<serde_json::Value>> = read_json(&reopened, &key).unwrap();
        assert_eq!(records.map(|r| r.len()), Some(4));
        assert!(!torn.exists());
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let store = MemoryStore::new();
        assert!(matches!(store.set("../etc/passwd", "x"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_corrupt_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(USERS_KEY, "{not json").unwrap();
        let users: Option<Vec<String>> = read_json(&store, USERS_KEY).unwrap();
        assert!(users.is_none());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, SAVED_ACCOUNTS_KEY, &vec!["a", "b"]).unwrap();
        let saved: Option<Vec<String>> = read_json(&store, SAVED_ACCOUNTS_KEY).unwrap();
        assert_eq!(saved, Some(vec!["a".to_string(), "b".to_string()]));
    }
}

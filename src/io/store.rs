use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::lock::{self, LockError, StoreLock};

/// Error type for store I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not encode snapshot: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// String key-value persistence used for task snapshots.
pub trait KeyValueStore {
    /// The value stored under `key`, or `None` if nothing was ever stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Keep other processes from writing until the returned guard drops.
    /// Stores private to one process have nothing to lock.
    fn lock(&self) -> Result<Option<StoreLock>, StoreError> {
        Ok(None)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn lock(&self) -> Result<Option<StoreLock>, StoreError> {
        (**self).lock()
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::WriteError {
            path: self.dir.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadError { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        self.ensure_dir()?;
        atomic_write(&path, value.as_bytes())
            .map_err(|e| StoreError::WriteError { path, source: e })
    }

    fn lock(&self) -> Result<Option<StoreLock>, StoreError> {
        self.ensure_dir()?;
        Ok(Some(StoreLock::acquire(&self.dir, lock::DEFAULT_WAIT)?))
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

/// In-process store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.get("todos").unwrap().is_none());
    }

    #[test]
    fn file_store_set_then_get() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested"));
        store.set("todos", "[]").unwrap();
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
        assert!(store.path_for("todos").ends_with("nested/todos.json"));

        store.set("todos", "[1]").unwrap();
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_store_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path());
        store.set("todos", "[]").unwrap();
        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["todos.json".to_string()]);
    }

    #[test]
    fn file_store_unreadable_path_is_error() {
        let tmp = TempDir::new().unwrap();
        // A directory where the file should be
        fs::create_dir_all(tmp.path().join("todos.json")).unwrap();
        let store = FileStore::new(tmp.path());
        assert!(matches!(
            store.get("todos"),
            Err(StoreError::ReadError { .. })
        ));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_lock_excludes_other_writers() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("data"));
        let held = store.lock().unwrap();
        assert!(held.is_some());
        assert!(StoreLock::try_acquire(store.dir()).unwrap().is_none());
        drop(held);
        assert!(StoreLock::try_acquire(store.dir()).unwrap().is_some());
    }

    #[test]
    fn memory_store_needs_no_lock() {
        assert!(MemoryStore::new().lock().unwrap().is_none());
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value persistence used by the quota ledger and search history.
///
/// Values are UTF-8 JSON text. Every write replaces the whole value for a key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store-related errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// File-backed store: a single JSON object mapping keys to string values.
///
/// The file is re-read on every access so several processes sharing it see
/// each other's writes (last writer wins).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write within this process.
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Current contents for a read-modify-write. An unparsable file is
    /// replaced rather than left blocking every write.
    fn read_for_update(&self) -> Result<HashMap<String, String>, StoreError> {
        match self.read_all() {
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store file is corrupt, overwriting it"
                );
                Ok(HashMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Write beside the target and rename so readers never see a partial file.
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, values)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;
        f()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_lock(|| Ok(self.read_all()?.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_lock(|| {
            let mut values = self.read_for_update()?;
            values.insert(key.to_string(), value.to_string());
            self.write_all(&values)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with_lock(|| {
            let mut values = self.read_for_update()?;
            if values.remove(key).is_some() {
                self.write_all(&values)?;
            }
            Ok(())
        })
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::CoreError;

/// A flat key → text store. Each key holds one whole JSON blob.
///
/// Writes replace the full value; there are no partial updates.
pub trait StoreBackend: Send + Sync {
    /// `Ok(None)` when the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Process-local backend, used by tests and the WASM host.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::FileIO("memory store lock poisoned".into()))
    }
}

impl StoreBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// File name stem a store key maps to. Characters that are unsafe in file
/// names become `_`, so distinct keys can share a stem.
pub fn store_file_stem(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

/// One JSON file per key inside a directory (native only).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileBackend {
    /// Use `dir` for storage, creating it if needed.
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// File backing `key`, named by [`store_file_stem`].
    pub fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{}.json", store_file_stem(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl StoreBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        // Write-then-rename so a crash never leaves a half-written blob.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

//! Durable string-to-string storage behind the session.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Keys the front end has always written; an existing profile hydrates
/// unchanged.
pub mod keys {
    pub const API_KEY: &str = "nano_api_key";
    pub const HISTORY: &str = "nano_history";
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Last write wins; no transactionality. Callers treat a failed write as
/// non-fatal and keep serving from memory for the rest of the session.
pub trait Persistence: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// One file per key under a directory. Writes land in a temp file first and
/// rename into place, so a crash never leaves a half-written value behind.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, PersistError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl Persistence for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let tmp = self.root.join(format!("{key}.tmp"));
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(value.as_bytes())?;
        }
        fs::rename(&tmp, self.key_path(key))?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().expect("poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.inner
            .write()
            .expect("poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

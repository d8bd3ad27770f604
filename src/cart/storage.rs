//! Cart storage
//!
//! The cart is persisted as one namespaced record, a JSON envelope holding the
//! cart state and a schema version.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;

/// Namespace the cart record is stored under.
pub const NAMESPACE: &str = "teakworld-cart";

/// Current schema version of the persisted record.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the record failed.
    #[error("cart storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The record could not be encoded or decoded.
    #[error("cart record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the in-memory record.
    #[error("cart storage lock poisoned")]
    Poisoned,
}

/// Versioned envelope around the persisted cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCart {
    /// Cart state.
    pub state: Cart,

    /// Schema version the record was written with.
    pub version: u32,
}

impl PersistedCart {
    /// Wrap a cart in an envelope at the current schema version.
    pub fn new(state: Cart) -> Self {
        Self {
            state,
            version: SCHEMA_VERSION,
        }
    }

    /// Encode as a JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if serialisation fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if the record is malformed.
    pub fn decode(record: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(record)?)
    }
}

/// A durable key-value slot holding the serialised cart record.
#[automock]
pub trait CartStorage {
    /// Read the stored record, `None` if nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn save(&self, record: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with a record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(record.into()))),
        }
    }

    /// Current record, if any.
    pub fn record(&self) -> Option<String> {
        self.record.lock().ok().and_then(|record| record.clone())
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let record = self.record.lock().map_err(|_poisoned| StorageError::Poisoned)?;

        Ok(record.clone())
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        let mut slot = self.record.lock().map_err(|_poisoned| StorageError::Poisoned)?;

        *slot = Some(record.to_string());

        Ok(())
    }
}

/// File storage: one `teakworld-cart.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{NAMESPACE}.json")),
        }
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        // Write beside the target then rename so readers never see half a record.
        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, record)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

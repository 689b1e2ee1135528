//! Key-value persistence abstractions for the inventory snapshots.

use std::sync::Arc;

use thiserror::Error;

use stockbook_core::InventoryError;

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{default_data_dir, FileKeyValueStore};
pub use memory::InMemoryKeyValueStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKeyValueStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for InventoryError {
    fn from(value: StorageError) -> Self {
        InventoryError::persistence(value.to_string())
    }
}

/// Local key-value store holding serialized record collections.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Write several records as one logical unit.
    ///
    /// The default writes one key after another; backends that can stage or
    /// transact the whole batch override it.
    fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.put(key, value)?;
        }
        Ok(())
    }
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).put_all(entries)
    }
}

impl<S> KeyValueStore for Box<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).put_all(entries)
    }
}

/// Keys become file names, so only `[A-Za-z0-9_.-]` is accepted.
pub(crate) fn ensure_valid_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait over a durable key-value store of
//! JSON values, and the typed layer on top of it. Each persisted value has a
//! [`StoreKey`] naming its key and its value type, so callers never handle raw
//! keys or untyped JSON:
//!
//! ```no_run
//! use stickerpicker::storage::{keys, JsonStorage, StorageExt};
//! use std::path::PathBuf;
//!
//! let mut storage = JsonStorage::new(PathBuf::from("/tmp/state.json"))?;
//! storage.save::<keys::StickersPerRow>(&6)?;
//! assert_eq!(storage.load::<keys::StickersPerRow>()?, Some(6));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::error::{PickerError, Result};

/// Abstraction over persistent key-value backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): versioned JSON file with atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process map, used by tests
pub trait Storage: Send {
    /// Reads the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_raw(&mut self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Deletes the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// A typed key of the durable store.
pub trait StoreKey {
    /// Key name on disk.
    const NAME: &'static str;

    /// Value type stored under the key.
    type Value: Serialize + DeserializeOwned;
}

/// Typed accessors available on every [`Storage`].
pub trait StorageExt: Storage {
    /// Loads the value of `K`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Storage`] when the stored value does not match
    /// the key's type.
    fn load<K: StoreKey>(&self) -> Result<Option<K::Value>> {
        self.get_raw(K::NAME)?
            .map(|raw| {
                serde_json::from_value(raw)
                    .map_err(|e| PickerError::Storage(format!("invalid value for {}: {e}", K::NAME)))
            })
            .transpose()
    }

    /// Stores the value of `K`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn save<K: StoreKey>(&mut self, value: &K::Value) -> Result<()> {
        let raw = serde_json::to_value(value)
            .map_err(|e| PickerError::Storage(format!("failed to serialize {}: {e}", K::NAME)))?;
        self.set_raw(K::NAME, raw)
    }

    /// Deletes the value of `K`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear<K: StoreKey>(&mut self) -> Result<()> {
        self.remove(K::NAME)
    }
}

impl<T: Storage + ?Sized> StorageExt for T {}

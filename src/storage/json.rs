//! JSON file-based storage backend.
//!
//! This module provides a human-readable, schema-versioned key-value store. It
//! uses atomic file writes (write-to-temp + rename) to prevent corruption on
//! crashes, and migrates older schema versions when a file is opened.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::{PickerError, Result};
use crate::storage::backend::Storage;
use crate::storage::migrate::{migrate_v1, SCHEMA_VERSION};

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Schema version of `values`.
    version: u32,

    /// Stored values by key.
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            values: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole document is kept in memory and written back after every
/// modification.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It's designed to be used from a single
/// worker thread, matching the Zellij plugin architecture.
///
/// # File Format
///
/// ```json
/// {
///   "version": 2,
///   "values": {
///     "stickers_per_row": 5,
///     "theme_override": "dark",
///     "frequently_used": { "cat": { "count": 3, "last_used": 1700000000000 } },
///     "frequently_used_cache": [ { "id": "cat", "url": "mxc://x/cat", "body": "cat" } ]
///   }
/// }
/// ```
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// If the file exists, loads existing data and migrates it to the current
    /// schema, persisting the migrated form immediately. Otherwise creates a new
    /// empty storage. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON or an unknown schema version
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (data, migrated) = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            (StorageData::default(), false)
        };

        tracing::debug!(version = data.version, keys = data.values.len(), migrated, "storage initialized");

        let mut storage = Self {
            file_path,
            data,
            dirty: migrated,
        };
        storage.save_to_file()?;
        Ok(storage)
    }

    /// Loads storage data, returning whether a migration happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON, or
    /// declares a schema version newer than this build understands.
    fn load_from_file(path: &Path) -> Result<(StorageData, bool)> {
        let contents = std::fs::read_to_string(path)?;
        let raw: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| PickerError::Storage(format!("failed to parse JSON: {e}")))?;

        let serde_json::Value::Object(object) = raw else {
            return Err(PickerError::Storage("store root is not an object".to_string()));
        };

        let version = object
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(1);

        match version {
            1 => {
                tracing::info!(path = ?path, "migrating store from version 1");
                let data = StorageData {
                    version: SCHEMA_VERSION,
                    values: migrate_v1(&object),
                };
                Ok((data, true))
            }
            v if v == u64::from(SCHEMA_VERSION) => {
                let data: StorageData = serde_json::from_value(serde_json::Value::Object(object))
                    .map_err(|e| PickerError::Storage(format!("failed to parse store: {e}")))?;
                Ok((data, false))
            }
            other => Err(PickerError::Storage(format!("unsupported store version {other}"))),
        }
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| PickerError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }

    /// Schema version of the loaded document.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.data.version
    }
}

impl Storage for JsonStorage {
    fn get_raw(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let _span = tracing::debug_span!("json_get", key = %key).entered();
        Ok(self.data.values.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        let _span = tracing::debug_span!("json_set", key = %key).entered();

        if self.data.values.get(key) == Some(&value) {
            tracing::trace!("value unchanged");
            return Ok(());
        }
        self.data.values.insert(key.to_string(), value);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove", key = %key).entered();

        if self.data.values.remove(key).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonStorage {
    /// Ensures data is saved on drop, even if an earlier write failed.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

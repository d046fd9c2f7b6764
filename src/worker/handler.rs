//! Worker thread implementation for durable store access.
//!
//! This module implements the Zellij worker thread interface. All store I/O runs
//! here so the main plugin thread never blocks on the filesystem. Spans created
//! while handling a message join the trace of the plugin span that sent it.

use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

use crate::domain::error::{PickerError, Result};
use crate::domain::{Item, ThemeName};
use crate::infrastructure::paths;
use crate::registry::FrequencyRecord;
use crate::storage::{keys, JsonStorage, PersistedState, Storage, StorageExt, StoreKey};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker thread state.
///
/// The storage backend is opened lazily on the first message.
#[derive(Serialize, Deserialize, Default)]
pub struct StickerWorker {
    /// Storage backend, initialized lazily on first use.
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl StickerWorker {
    /// Opens the JSON store in the plugin data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let storage: Box<dyn Storage> = Box::new(JsonStorage::new(paths::state_file_path())?);
        Ok(Self::with_storage(storage))
    }

    /// Creates a worker over an existing backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self { storage: Some(storage) }
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| PickerError::Worker("Storage not initialized".to_string()))
    }

    /// Maps a storage result to a response with consistent logging.
    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn saved<K: StoreKey>() -> WorkerResponse {
        WorkerResponse::Saved {
            key: K::NAME.to_string(),
        }
    }

    fn handle_load_state(&mut self) -> WorkerResponse {
        Self::handle_db_result(
            "load state",
            self.get_storage().map(|storage| PersistedState::read(&**storage)),
            |state| {
                tracing::debug!(
                    tracked = state.frequently_used.len(),
                    cached = state.frequently_used_cache.len(),
                    "persisted state loaded"
                );
                WorkerResponse::StateLoaded { state }
            },
        )
    }

    fn handle_save_stickers_per_row(&mut self, value: usize) -> WorkerResponse {
        Self::handle_db_result(
            "save stickers per row",
            self.get_storage()
                .and_then(|storage| storage.save::<keys::StickersPerRow>(&value)),
            |()| Self::saved::<keys::StickersPerRow>(),
        )
    }

    fn handle_save_theme_override(&mut self, theme: Option<ThemeName>) -> WorkerResponse {
        Self::handle_db_result(
            "save theme override",
            self.get_storage().and_then(|storage| match theme {
                Some(theme) => storage.save::<keys::ThemeOverride>(&theme),
                None => storage.clear::<keys::ThemeOverride>(),
            }),
            |()| Self::saved::<keys::ThemeOverride>(),
        )
    }

    fn handle_save_frequently_used(&mut self, record: &FrequencyRecord, cache: &[Item]) -> WorkerResponse {
        Self::handle_db_result(
            "save frequently used",
            self.get_storage().and_then(|storage| {
                storage.save::<keys::FrequentlyUsed>(record)?;
                storage.save::<keys::FrequentlyUsedCache>(&cache.to_vec())
            }),
            |()| Self::saved::<keys::FrequentlyUsed>(),
        )
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response to post back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadState { .. } => self.handle_load_state(),
            WorkerMessage::SaveStickersPerRow { value, .. } => self.handle_save_stickers_per_row(value),
            WorkerMessage::SaveThemeOverride { theme, .. } => self.handle_save_theme_override(theme),
            WorkerMessage::SaveFrequentlyUsed { record, cache, .. } => {
                self.handle_save_frequently_used(&record, &cache)
            }
        }
    }
}

/// Initializes tracing for the worker thread with the default configuration.
fn init_worker_tracing() {
    crate::observability::init_tracing(&crate::Config::default());
}

/// Tracks whether worker tracing has been initialized.
static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

fn post_response(name: String, response: &WorkerResponse) {
    match serde_json::to_string(response) {
        Ok(payload) => post_message_to_plugin(PluginMessage {
            name,
            payload,
            worker_name: None,
        }),
        Err(e) => tracing::warn!(error = %e, "failed to serialize worker response"),
    }
}

impl ZellijWorker<'_> for StickerWorker {
    /// Handles incoming messages from the main plugin thread.
    ///
    /// Initializes tracing and storage on first use, decodes the payload,
    /// handles it and posts the response back under the same message name.
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
        }

        if self.storage.is_none() {
            match Self::open() {
                Ok(worker) => self.storage = worker.storage,
                Err(e) => {
                    tracing::error!(error = %e, "failed to initialize storage");
                    post_response(
                        message,
                        &WorkerResponse::Error {
                            message: format!("Failed to initialize storage: {e}"),
                        },
                    );
                    return;
                }
            }
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);
        post_response(message, &response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn worker() -> StickerWorker {
        StickerWorker::with_storage(Box::new(MemoryStorage::default()))
    }

    #[test]
    fn saved_settings_are_loaded_back() {
        let mut worker = worker();
        worker.handle_message(WorkerMessage::save_stickers_per_row(6));
        worker.handle_message(WorkerMessage::save_theme_override(Some(ThemeName::Dark)));

        let WorkerResponse::StateLoaded { state } = worker.handle_message(WorkerMessage::load_state()) else {
            panic!("expected state");
        };
        assert_eq!(state.stickers_per_row, Some(6));
        assert_eq!(state.theme_override, Some(ThemeName::Dark));
    }

    #[test]
    fn clearing_theme_override_removes_it() {
        let mut worker = worker();
        worker.handle_message(WorkerMessage::save_theme_override(Some(ThemeName::Black)));
        let response = worker.handle_message(WorkerMessage::save_theme_override(None));
        assert_eq!(response, WorkerResponse::Saved { key: "theme_override".into() });

        let WorkerResponse::StateLoaded { state } = worker.handle_message(WorkerMessage::load_state()) else {
            panic!("expected state");
        };
        assert_eq!(state.theme_override, None);
    }

    #[test]
    fn frequency_record_and_snapshot_persist_together() {
        let mut worker = worker();
        let mut record = FrequencyRecord::default();
        record.record("cat", 10);
        let cache = vec![Item::new("cat", "mxc://x/cat", "cat")];
        worker.handle_message(WorkerMessage::save_frequently_used(record.clone(), cache.clone()));

        let WorkerResponse::StateLoaded { state } = worker.handle_message(WorkerMessage::load_state()) else {
            panic!("expected state");
        };
        assert_eq!(state.frequently_used, record);
        assert_eq!(state.frequently_used_cache, cache);
    }

    #[test]
    fn missing_storage_reports_error() {
        let mut worker = StickerWorker::default();
        let response = worker.handle_message(WorkerMessage::load_state());
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }
}

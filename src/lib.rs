//! Sticker picker: a Zellij plugin for browsing remote sticker packs.
//!
//! The picker provides:
//! - Sequential retrieval of an index and its packs over HTTP, published in
//!   index order as they arrive
//! - Live, revertible search across every loaded pack
//! - A frequently-used section that survives reloads
//! - Lazy thumbnail activation and a navigation strip that follows the list
//! - Persistent display settings backed by a worker-owned JSON store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - AppState, Event → handle_event → Action          │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!          │                 │                  │
//! ┌────────────────┐ ┌──────────────┐ ┌──────────────────┐
//! │ loader/        │ │ viewport/    │ │ worker/          │
//! │ registry/      │ │ layout, lazy │ │ storage/         │
//! │ search/        │ │ images, nav  │ │ (worker thread)  │
//! └────────────────┘ └──────────────┘ └──────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Items, packs, index, errors, settings            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/stickerpicker.wasm" {
//!         packs_url "https://example.org/stickers/packs/"
//!         config "index.json"
//!         theme "dark"
//!         emit_to "file:/path/to/chat.wasm"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`): parse configuration, initialize tracing,
//!    build `AppState`, request permissions, subscribe to events.
//! 2. **Permissions granted**: ask the worker for persisted state.
//! 3. **State restored**: the first load cycle fetches the index, then each
//!    pack in order; every response comes back as a `FetchCompleted` event.
//! 4. **Picking**: the picked item is piped to the host as
//!    `stickerpicker::send` and its usage is persisted through the worker.
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default())?;
//! let (_, actions) = handle_event(&mut state, &Event::Reload)?;
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), stickerpicker::PickerError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod loader;
pub mod registry;
pub mod search;
pub mod storage;
pub mod viewport;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{Item, Pack, PickerError, Result, ThemeName};
pub use registry::{FrequencyCache, ItemRegistry};
pub use ui::Theme;

use std::collections::BTreeMap;

/// Packs base used when the plugin configuration names none.
pub const DEFAULT_PACKS_URL: &str = "http://localhost:8080/packs/";

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL relative pack locations resolve against.
    pub packs_url: String,

    /// Index location override, relative to `packs_url` or absolute.
    ///
    /// Default: `index.json` under `packs_url`.
    pub index: Option<String>,

    /// Launch default theme, used while no override is persisted.
    pub theme: ThemeName,

    /// Plugin URL picked items are piped to. Broadcast when unset.
    pub emit_to: Option<String>,

    /// Tracing filter directive (`trace`, `debug`, `info`, ...).
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packs_url: DEFAULT_PACKS_URL.to_string(),
            index: None,
            theme: ThemeName::default(),
            emit_to: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Blank values count as absent. An unknown theme falls back to the
    /// default theme.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use stickerpicker::{Config, ThemeName};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("packs_url".to_string(), "https://example.org/packs".to_string());
    /// map.insert("theme".to_string(), "black".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.packs_url, "https://example.org/packs");
    /// assert_eq!(config.theme, ThemeName::Black);
    /// assert_eq!(config.emit_to, None);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            packs_url: get("packs_url").unwrap_or_else(|| DEFAULT_PACKS_URL.to_string()),
            index: get("config"),
            theme: get("theme").map_or_else(ThemeName::default, |t| ThemeName::parse_or_default(&t)),
            emit_to: get("emit_to"),
            trace_level: get("trace_level"),
        }
    }
}

/// Builds the application state for `config`.
///
/// Nothing is fetched yet; the first load cycle starts once persisted state
/// arrives from the worker.
///
/// # Errors
///
/// Returns [`PickerError::InvalidLocation`] when the packs base or index
/// location is not a valid URL.
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(packs_url = %config.packs_url, theme = %config.theme, "initializing sticker picker");

    let base = infrastructure::packs_base(&config.packs_url)?;
    let index = infrastructure::index_location(&base, config.index.as_deref())?;
    tracing::debug!(index = %index, "index location resolved");

    Ok(AppState::new(base, index, config.theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_options_use_defaults() {
        let mut map = BTreeMap::new();
        map.insert("packs_url".to_string(), "  ".to_string());
        map.insert("theme".to_string(), "neon".to_string());
        let config = Config::from_zellij(&map);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn index_override_resolves_against_packs_url() {
        let config = Config {
            packs_url: "https://example.org/stickers".to_string(),
            index: Some("custom.json".to_string()),
            ..Config::default()
        };
        let mut state = initialize(&config).unwrap();
        let request = state.reload();
        assert_eq!(request.url, "https://example.org/stickers/custom.json");
    }

    #[test]
    fn invalid_packs_url_is_rejected() {
        let config = Config {
            packs_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(initialize(&config), Err(PickerError::InvalidLocation { .. })));
    }
}

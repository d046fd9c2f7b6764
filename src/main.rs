//! Zellij plugin wrapper and entry point.
//!
//! This module provides the thin integration layer between the sticker picker
//! library and the Zellij plugin system. It implements the `ZellijPlugin` and
//! `ZellijWorker` traits to handle Zellij events and lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling, web requests
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  StickerWorker   │   │  ← Persisted settings and frequency data
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Key, Mouse, `CustomMessage`, `WebRequestResult` events
//! 3. **Permissions granted**: Ask the worker for persisted state
//! 4. **Update**: Map events, delegate to the library layer, run actions
//! 5. **Render**: Report size changes, then call the library renderer
//!
//! # Keybindings
//!
//! - Printable characters: type into the search bar
//! - `Backspace`: delete the last search character
//! - `Esc`: clear the search, or hide the picker when it is empty
//! - Arrows: move the selection, `Enter`: send the selected sticker
//! - `Tab`: switch to the GIPHY tab and back
//! - `PageUp`/`PageDown`: scroll one screen
//! - `Ctrl+n`/`Ctrl+p`: next/previous section
//! - `Alt+Left`/`Alt+Right`: scroll the navigation strip
//! - `Alt+=`/`Alt+-`: more/fewer stickers per row
//! - `Ctrl+t`: cycle the theme, `Alt+0`: back to the default theme
//! - `Ctrl+r`: reload every pack
//!
//! Mouse clicks pick stickers, jump through the navigation strip and change
//! settings; the wheel scrolls the list.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{pipe_message_to_plugin, post_message_to, web_request};

use stickerpicker::app::{AppState, SEND_MESSAGE_NAME};
use stickerpicker::loader::{FetchRequest, FetchResponse};
use stickerpicker::worker::{StickerWorker, WorkerMessage, WorkerResponse};
use stickerpicker::{handle_event, Action, Config, Event};

register_plugin!(State);
register_worker!(StickerWorker, sticker_worker, STICKER_WORKER);

/// Rows the mouse wheel scrolls per notch.
const WHEEL_ROWS: i32 = 3;

/// Columns the navigation strip scrolls per key press.
const NAV_STEP: i32 = 8;

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns like worker
/// communication and the pipe target of picked stickers.
#[derive(Default)]
struct State {
    /// Core application state, built on load.
    app: Option<AppState>,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,

    /// Plugin URL picked stickers are piped to. Broadcast when unset.
    emit_to: Option<String>,
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// A configuration that names an invalid location still loads: the
    /// picker opens on the error screen and a reload retries.
    ///
    /// # Permissions
    ///
    /// - `WebAccess`: fetch the index and packs
    /// - `MessageAndLaunchOtherPlugins`: pipe picked stickers to the host
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        stickerpicker::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(packs_url = %config.packs_url, index = ?config.index, "parsed configuration");
        self.worker_name = "stickerpicker".to_string();
        self.emit_to.clone_from(&config.emit_to);
        self.app = match stickerpicker::initialize(&config) {
            Ok(app) => Some(app),
            Err(e) => {
                tracing::error!(error = %e, "invalid configuration");
                stickerpicker::initialize(&Config::default()).ok().map(|mut app| {
                    app.fail(e.to_string());
                    app
                })
            }
        };

        tracing::debug!("requesting permissions");
        request_permission(&[
            PermissionType::WebAccess,
            PermissionType::MessageAndLaunchOtherPlugins,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::Mouse,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Translates Zellij events to library events, delegates to `handle_event`,
    /// and executes resulting actions. Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Mouse(mouse) => match Self::map_mouse_event(mouse) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match FetchResponse::from_context(status, body, &context) {
                    Some(response) => Event::FetchCompleted(response),
                    None => {
                        tracing::debug!(status, "ignoring web response without fetch context");
                        return false;
                    }
                }
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                self.handle_permission_result(permissions);
                return false;
            }
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    /// Renders the plugin UI, reporting size changes to the library first.
    fn render(&mut self, rows: usize, cols: usize) {
        let resized = self.app.as_ref().is_some_and(|app| app.rows != rows || app.cols != cols);
        if resized {
            self.dispatch(&Event::Resize { rows, cols });
        }
        if let Some(app) = &self.app {
            stickerpicker::ui::render(app);
        }
    }
}

impl State {
    /// Runs a library event and executes the resulting actions.
    fn dispatch(&mut self, event: &Event) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };

        match handle_event(app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Mouse(mouse) => format!("Mouse({mouse:?})"),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::NextSection),
                BareKey::Char('p') => Some(Event::PrevSection),
                BareKey::Char('r') => Some(Event::Reload),
                BareKey::Char('t') => Some(Event::CycleTheme),
                _ => None,
            };
        }
        if key.has_modifiers(&[KeyModifier::Alt]) {
            return match key.bare_key {
                BareKey::Char('=' | '+') => Some(Event::AdjustStickersPerRow(1)),
                BareKey::Char('-') => Some(Event::AdjustStickersPerRow(-1)),
                BareKey::Char('0') => Some(Event::SetTheme(None)),
                BareKey::Left => Some(Event::ScrollNav(-NAV_STEP)),
                BareKey::Right => Some(Event::ScrollNav(NAV_STEP)),
                _ => None,
            };
        }

        let app = self.app.as_ref()?;
        let page = i32::try_from(app.list_rows()).unwrap_or(i32::MAX).max(1);

        Some(match key.bare_key {
            BareKey::Esc if app.search_input.is_empty() => Event::CloseFocus,
            BareKey::Esc => Event::ClearSearch,
            BareKey::Up => Event::CursorUp,
            BareKey::Down => Event::CursorDown,
            BareKey::Left => Event::CursorLeft,
            BareKey::Right => Event::CursorRight,
            BareKey::PageUp => Event::ScrollList(-page),
            BareKey::PageDown => Event::ScrollList(page),
            BareKey::Enter => Event::SendSelected,
            BareKey::Tab => Event::ToggleAlternateSource,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    /// Maps mouse events to application events.
    fn map_mouse_event(mouse: Mouse) -> Option<Event> {
        match mouse {
            Mouse::ScrollUp(_) => Some(Event::ScrollList(-WHEEL_ROWS)),
            Mouse::ScrollDown(_) => Some(Event::ScrollList(WHEEL_ROWS)),
            Mouse::LeftClick(line, col) => {
                let line = usize::try_from(line).ok()?;
                Some(Event::Click { line, col })
            }
            _ => None,
        }
    }

    /// Handles permission request results.
    fn handle_permission_result(&mut self, permissions: PermissionStatus) {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted - loading persisted state");
                self.post_worker_message(&WorkerMessage::load_state());
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - packs cannot be fetched");
                if let Some(app) = self.app.as_mut() {
                    app.fail("Web access was denied");
                }
            }
        }
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message == self.worker_name {
            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => Some(Event::WorkerResponse(response)),
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        } else {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            None
        }
    }

    /// Posts a message to the worker thread.
    ///
    /// Serializes the message as JSON and sends via Zellij's IPC system.
    /// Serialization errors are logged, not propagated.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Issues the web request for an index or pack document.
    fn fetch(request: &FetchRequest) {
        tracing::debug!(url = %request.url, cycle = request.cycle, bypass_cache = request.bypass_cache, "fetching");
        web_request(&request.url, HttpVerb::Get, request.headers(), vec![], request.context());
    }

    /// Executes an action returned from event handling.
    ///
    /// Translates library actions to Zellij API calls.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::Fetch(request) => Self::fetch(request),
            Action::PostToWorker(ref message) => {
                self.post_worker_message(message);
            }
            Action::EmitItem { payload } => match serde_json::to_string(payload) {
                Ok(json) => {
                    let mut message = MessageToPlugin::new(SEND_MESSAGE_NAME).with_payload(json);
                    if let Some(url) = &self.emit_to {
                        message = message.with_plugin_url(url);
                    }
                    tracing::debug!(sticker = %payload.body, "emitting sticker");
                    pipe_message_to_plugin(message);
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize sticker"),
            },
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
        }
    }
}

//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! fetch results and worker responses, translating them into state changes
//! and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Loading**: `PersistedStateLoaded`, `FetchCompleted`, `Reload`
//! - **Input**: `Char`, `Backspace`, `ClearSearch`
//! - **Navigation**: cursor moves, `ScrollList`, `ScrollNav`, `JumpToSection`
//! - **Settings**: `SetStickersPerRow`, `AdjustStickersPerRow`, `SetTheme`, `CycleTheme`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::app::{handle_event, AppState, Event};
//! use stickerpicker::domain::ThemeName;
//! use stickerpicker::infrastructure::{index_location, packs_base};
//!
//! let base = packs_base("https://example.org/packs/")?;
//! let index = index_location(&base, None)?;
//! let mut state = AppState::new(base, index, ThemeName::Light);
//! let (render, actions) = handle_event(&mut state, &Event::Reload)?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::state::Direction;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::ThemeName;
use crate::loader::FetchResponse;
use crate::storage::PersistedState;
use crate::worker::WorkerResponse;

/// Events triggered by user input, fetch completions, or worker responses.
///
/// The event handler processes these sequentially, ensuring deterministic
/// state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Persisted settings and frequency data arrived from the worker.
    ///
    /// The first one starts the initial load cycle.
    PersistedStateLoaded(PersistedState),

    /// An index or pack request finished.
    FetchCompleted(FetchResponse),

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),

    /// Starts a new load cycle bypassing HTTP caches.
    Reload,

    /// Appends a character to the search term.
    Char(char),
    /// Removes the last character from the search term.
    Backspace,
    /// Clears the search term.
    ClearSearch,

    /// Switches between the pack list and the alternate-source tab.
    ToggleAlternateSource,

    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,

    /// Sends the item under the cursor.
    SendSelected,

    /// Left click at a screen position.
    Click {
        line: usize,
        col: usize,
    },

    /// Scrolls the pack list by a number of rows.
    ScrollList(i32),
    /// Scrolls the navigation strip by a number of columns.
    ScrollNav(i32),

    /// Scrolls the pack list to a section.
    JumpToSection(String),
    NextSection,
    PrevSection,

    /// Moves items-per-row by a delta.
    AdjustStickersPerRow(i32),
    SetStickersPerRow(usize),

    /// Sets or clears the theme override.
    SetTheme(Option<ThemeName>),
    CycleTheme,

    /// The plugin pane was resized.
    Resize {
        rows: usize,
        cols: usize,
    },

    /// Hides the plugin pane.
    CloseFocus,
}

impl Event {
    /// Short name used as the span field, keeping payloads out of traces.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PersistedStateLoaded(_) => "persisted_state_loaded",
            Self::FetchCompleted(_) => "fetch_completed",
            Self::WorkerResponse(_) => "worker_response",
            Self::Reload => "reload",
            Self::Char(_) => "char",
            Self::Backspace => "backspace",
            Self::ClearSearch => "clear_search",
            Self::ToggleAlternateSource => "toggle_alternate_source",
            Self::CursorUp => "cursor_up",
            Self::CursorDown => "cursor_down",
            Self::CursorLeft => "cursor_left",
            Self::CursorRight => "cursor_right",
            Self::SendSelected => "send_selected",
            Self::Click { .. } => "click",
            Self::ScrollList(_) => "scroll_list",
            Self::ScrollNav(_) => "scroll_nav",
            Self::JumpToSection(_) => "jump_to_section",
            Self::NextSection => "next_section",
            Self::PrevSection => "prev_section",
            Self::AdjustStickersPerRow(_) => "adjust_stickers_per_row",
            Self::SetStickersPerRow(_) => "set_stickers_per_row",
            Self::SetTheme(_) => "set_theme",
            Self::CycleTheme => "cycle_theme",
            Self::Resize { .. } => "resize",
            Self::CloseFocus => "close_focus",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Returns
///
/// Whether the UI needs a render, and the actions to execute in order.
///
/// # Errors
///
/// Reserved for failures the runtime must see; state transitions themselves
/// never fail.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event name.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::PersistedStateLoaded(persisted) => Ok((true, state.restore(persisted.clone()))),
        Event::FetchCompleted(response) => match state.apply_fetch(response.clone()) {
            Some(actions) => Ok((true, actions)),
            None => Ok((false, vec![])),
        },
        Event::WorkerResponse(response) => match response {
            WorkerResponse::StateLoaded { state: persisted } => Ok((true, state.restore(persisted.clone()))),
            WorkerResponse::Saved { key } => {
                tracing::trace!(key = %key, "value persisted");
                Ok((false, vec![]))
            }
            WorkerResponse::Error { message } => {
                tracing::error!("Worker error: {}", message);
                // Without persisted state the picker still loads with defaults.
                let fetch = state.start();
                Ok((fetch.is_some(), fetch.map(Action::Fetch).into_iter().collect()))
            }
        },
        Event::Reload => Ok((true, vec![Action::Fetch(state.reload())])),
        Event::Char(c) => Ok((state.push_search_char(*c), vec![])),
        Event::Backspace => Ok((state.pop_search_char(), vec![])),
        Event::ClearSearch => Ok((state.clear_search(), vec![])),
        Event::ToggleAlternateSource => Ok((state.toggle_alternate_source(), vec![])),
        Event::CursorUp => Ok((state.move_cursor(Direction::Up), vec![])),
        Event::CursorDown => Ok((state.move_cursor(Direction::Down), vec![])),
        Event::CursorLeft => Ok((state.move_cursor(Direction::Left), vec![])),
        Event::CursorRight => Ok((state.move_cursor(Direction::Right), vec![])),
        Event::SendSelected => {
            let actions = state.send_selected();
            if actions.is_empty() {
                tracing::debug!("no item selected");
            }
            Ok((!actions.is_empty(), actions))
        }
        Event::Click { line, col } => Ok(state.click(*line, *col)),
        Event::ScrollList(delta) => Ok((state.scroll_list(*delta), vec![])),
        Event::ScrollNav(delta) => Ok((state.scroll_nav(*delta), vec![])),
        Event::JumpToSection(id) => Ok((state.jump_to_section(id), vec![])),
        Event::NextSection => Ok((state.next_section(), vec![])),
        Event::PrevSection => Ok((state.prev_section(), vec![])),
        Event::AdjustStickersPerRow(delta) => {
            let save = state.adjust_stickers_per_row(*delta);
            Ok((save.is_some(), save.into_iter().collect()))
        }
        Event::SetStickersPerRow(value) => {
            let save = state.set_stickers_per_row(*value);
            Ok((save.is_some(), save.into_iter().collect()))
        }
        Event::SetTheme(theme) => Ok((true, vec![state.set_theme(*theme)])),
        Event::CycleTheme => Ok((true, vec![state.cycle_theme()])),
        Event::Resize { rows, cols } => Ok((state.resize(*rows, *cols), vec![])),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::LoadPhase;
    use crate::infrastructure::{index_location, packs_base};
    use crate::worker::WorkerMessage;

    fn state() -> AppState {
        let base = packs_base("https://example.org/packs/").unwrap();
        let index = index_location(&base, None).unwrap();
        let mut state = AppState::new(base, index, ThemeName::Light);
        state.resize(24, 60);
        state
    }

    #[test]
    fn persisted_state_starts_first_cycle() {
        let mut state = state();
        let (render, actions) = handle_event(&mut state, &Event::PersistedStateLoaded(PersistedState::default())).unwrap();
        assert!(render);
        assert!(matches!(actions.as_slice(), [Action::Fetch(request)] if !request.bypass_cache));
    }

    #[test]
    fn worker_error_still_starts_loading_once() {
        let mut state = state();
        let error = Event::WorkerResponse(WorkerResponse::Error {
            message: "disk full".into(),
        });
        let (_, actions) = handle_event(&mut state, &error).unwrap();
        assert_eq!(actions.len(), 1);
        let (_, actions) = handle_event(&mut state, &error).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn missing_index_means_empty() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        let [Action::Fetch(request)] = actions.as_slice() else {
            panic!("expected index fetch");
        };
        handle_event(&mut state, &Event::FetchCompleted(FetchResponse::for_request(request, 404, ""))).unwrap();
        assert_eq!(state.phase, LoadPhase::Empty);
    }

    #[test]
    fn stale_fetch_skips_render() {
        let mut state = state();
        let (_, first) = handle_event(&mut state, &Event::Reload).unwrap();
        handle_event(&mut state, &Event::Reload).unwrap();
        let [Action::Fetch(old)] = first.as_slice() else {
            panic!("expected index fetch");
        };
        let (render, actions) =
            handle_event(&mut state, &Event::FetchCompleted(FetchResponse::for_request(old, 200, "{}"))).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn theme_changes_are_persisted() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::SetTheme(Some(ThemeName::Black))).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::save_theme_override(Some(ThemeName::Black)))]
        );
        assert_eq!(state.theme.name, "black");
    }

    #[test]
    fn typing_is_ignored_while_loading() {
        let mut state = state();
        handle_event(&mut state, &Event::Reload).unwrap();
        let (render, _) = handle_event(&mut state, &Event::Char('x')).unwrap();
        assert!(!render);
        assert!(state.search_input.is_empty());
    }

    #[test]
    fn close_focus_emits_action() {
        let mut state = state();
        let (render, actions) = handle_event(&mut state, &Event::CloseFocus).unwrap();
        assert!(!render);
        assert_eq!(actions, vec![Action::CloseFocus]);
    }
}

/// Whole load-browse-pick flows, with a scripted host answering every fetch.
#[cfg(test)]
mod flows {
    use std::collections::HashMap;

    use super::*;
    use crate::app::modes::LoadPhase;
    use crate::domain::{Item, FREQUENTLY_USED_PACK_ID};
    use crate::loader::FetchRequest;
    use crate::registry::FrequencyRecord;
    use crate::viewport::ElementId;
    use crate::worker::WorkerMessage;
    use crate::{initialize, Config};

    const BASE: &str = "https://example.org/packs/";

    /// Serves documents by URL; unknown URLs answer 404.
    struct ScriptedHost {
        documents: HashMap<String, (u16, String)>,
    }

    impl ScriptedHost {
        fn new() -> Self {
            Self {
                documents: HashMap::new(),
            }
        }

        fn index(mut self, packs: &[&str]) -> Self {
            let list: Vec<String> = packs.iter().map(|p| format!("\"{p}.json\"")).collect();
            self.documents
                .insert(format!("{BASE}index.json"), (200, format!(r#"{{"packs":[{}]}}"#, list.join(","))));
            self
        }

        fn pack(mut self, id: &str, items: &[(&str, &str)]) -> Self {
            let stickers: Vec<String> = items
                .iter()
                .map(|(item, body)| format!(r#"{{"id":"{item}","url":"mxc://x/{item}","body":"{body}"}}"#))
                .collect();
            let body = format!(r#"{{"id":"{id}","title":"{id}","stickers":[{}]}}"#, stickers.join(","));
            self.documents.insert(format!("{BASE}{id}.json"), (200, body));
            self
        }

        fn status(mut self, path: &str, status: u16) -> Self {
            self.documents.insert(format!("{BASE}{path}"), (status, String::new()));
            self
        }

        fn answer(&self, request: &FetchRequest) -> Event {
            let (status, body) = self
                .documents
                .get(&request.url)
                .cloned()
                .unwrap_or((404, String::new()));
            // Round-trip through the context map the host hands back.
            let response = FetchResponse::from_context(status, body.into_bytes(), &request.context()).unwrap();
            Event::FetchCompleted(response)
        }

        /// Handles `event`, then answers fetches until none is outstanding.
        /// Returns every non-fetch action produced on the way.
        fn drive(&self, state: &mut AppState, event: &Event) -> Vec<Action> {
            let mut pending = vec![event.clone()];
            let mut other = Vec::new();
            while let Some(event) = pending.pop() {
                let (_, actions) = handle_event(state, &event).unwrap();
                for action in actions {
                    match action {
                        Action::Fetch(request) => pending.push(self.answer(&request)),
                        action => other.push(action),
                    }
                }
            }
            other
        }
    }

    fn state() -> AppState {
        let mut state = initialize(&Config {
            packs_url: BASE.to_string(),
            ..Config::default()
        })
        .unwrap();
        handle_event(&mut state, &Event::Resize { rows: 24, cols: 30 }).unwrap();
        state
    }

    fn section_ids(state: &AppState) -> Vec<String> {
        state.sections().iter().map(|p| p.id.clone()).collect()
    }

    fn saved_snapshot(actions: &[Action]) -> Option<&[Item]> {
        actions.iter().rev().find_map(|action| match action {
            Action::PostToWorker(WorkerMessage::SaveFrequentlyUsed { cache, .. }) => Some(cache.as_slice()),
            _ => None,
        })
    }

    #[test]
    fn packs_publish_in_index_order() {
        let host = ScriptedHost::new()
            .index(&["zebra", "apple", "mango"])
            .pack("zebra", &[("z1", "zebra")])
            .pack("apple", &[("a1", "apple")])
            .pack("mango", &[("m1", "mango")]);
        let mut state = state();

        let actions = host.drive(&mut state, &Event::PersistedStateLoaded(PersistedState::default()));

        assert_eq!(state.phase, LoadPhase::Ready);
        assert_eq!(section_ids(&state), [FREQUENTLY_USED_PACK_ID, "zebra", "apple", "mango"]);
        assert!(saved_snapshot(&actions).is_some());
    }

    #[test]
    fn later_pack_shadows_earlier_item() {
        let host = ScriptedHost::new()
            .index(&["first", "second"])
            .pack("first", &[("dup", "old label")])
            .pack("second", &[("dup", "new label")]);
        let mut state = state();

        host.drive(&mut state, &Event::Reload);

        assert_eq!(state.registry.resolve("dup").map(|i| i.body.as_str()), Some("new label"));
        assert_eq!(state.packs[0].stickers[0].body, "old label");
    }

    #[test]
    fn empty_index_is_empty_phase() {
        let host = ScriptedHost::new().index(&[]);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);
        assert_eq!(state.phase, LoadPhase::Empty);
    }

    #[test]
    fn server_error_names_status_text() {
        let host = ScriptedHost::new().status("index.json", 500);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);

        let LoadPhase::Error(message) = &state.phase else {
            panic!("expected error phase, got {:?}", state.phase);
        };
        assert!(message.contains("Internal Server Error"), "{message}");
        assert!(message.contains("500"), "{message}");
    }

    #[test]
    fn frequently_used_snapshot_survives_reload() {
        let host = ScriptedHost::new().index(&["cats"]).pack("cats", &[("c1", "cat")]);
        let mut record = FrequencyRecord::default();
        record.record("retired", 1_000);
        let persisted = PersistedState {
            frequently_used: record,
            frequently_used_cache: vec![Item::new("retired", "mxc://x/retired", "retired")],
            ..PersistedState::default()
        };
        let mut state = state();

        host.drive(&mut state, &Event::PersistedStateLoaded(persisted));
        host.drive(&mut state, &Event::Reload);

        let frequent = &state.sections()[0];
        assert_eq!(frequent.id, FREQUENTLY_USED_PACK_ID);
        assert_eq!(frequent.stickers.len(), 1);
        assert_eq!(frequent.stickers[0].id, "retired");
    }

    #[test]
    fn every_picked_item_resolves_after_its_pack_is_gone() {
        let ids: Vec<String> = (0..17).map(|i| format!("s{i:02}")).collect();
        let items: Vec<(&str, &str)> = ids.iter().map(|id| (id.as_str(), id.as_str())).collect();
        let host = ScriptedHost::new().index(&["all"]).pack("all", &items);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);

        for (i, id) in ids.iter().enumerate() {
            state.frequent.record_use(id, i64::try_from(i).unwrap(), &state.registry);
        }
        assert_eq!(state.frequent.record().len(), 17);

        let mut fresh = self::state();
        fresh.restore(PersistedState {
            frequently_used: state.frequent.record().clone(),
            frequently_used_cache: state.frequent.snapshot().to_vec(),
            ..PersistedState::default()
        });
        let gone = ScriptedHost::new().index(&[]);
        gone.drive(&mut fresh, &Event::Reload);

        let missing: Vec<&String> = ids.iter().filter(|id| fresh.registry.resolve(id).is_none()).collect();
        assert!(missing.is_empty(), "unresolvable after reload: {missing:?}");
        assert_eq!(fresh.sections()[0].stickers.len(), crate::registry::DISPLAY_LIMIT);
    }

    #[test]
    fn late_restore_during_reload_keeps_snapshot_items() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        let [Action::Fetch(index_request)] = actions.as_slice() else {
            panic!("expected index fetch");
        };

        let mut record = FrequencyRecord::default();
        record.record("retired", 1_000);
        handle_event(
            &mut state,
            &Event::PersistedStateLoaded(PersistedState {
                frequently_used: record,
                frequently_used_cache: vec![Item::new("retired", "mxc://x/retired", "retired")],
                ..PersistedState::default()
            }),
        )
        .unwrap();

        let host = ScriptedHost::new().index(&["cats"]).pack("cats", &[("c1", "cat")]);
        let actions = host.drive(&mut state, &host.answer(index_request));

        assert!(state.registry.resolve("retired").is_some());
        let saved = saved_snapshot(&actions).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, "retired");
    }

    #[test]
    fn restore_after_finished_cycle_saves_restored_items_again() {
        let host = ScriptedHost::new().index(&["cats"]).pack("cats", &[("c1", "cat")]);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);
        assert!(state.registry.is_frozen());

        let mut record = FrequencyRecord::default();
        record.record("retired", 1_000);
        record.record("c1", 2_000);
        let (_, actions) = handle_event(
            &mut state,
            &Event::PersistedStateLoaded(PersistedState {
                frequently_used: record,
                frequently_used_cache: vec![Item::new("retired", "mxc://x/retired", "retired")],
                ..PersistedState::default()
            }),
        )
        .unwrap();

        assert!(state.registry.is_frozen());
        assert!(state.registry.resolve("retired").is_some());
        let saved: Vec<&str> = saved_snapshot(&actions).unwrap().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(saved, ["c1", "retired"]);
    }

    #[test]
    fn search_drops_empty_sections_and_reverts() {
        let host = ScriptedHost::new()
            .index(&["cats", "dogs"])
            .pack("cats", &[("c1", "Grumpy Cat"), ("c2", "Sleepy cat")])
            .pack("dogs", &[("d1", "Good dog")]);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);
        let before = section_ids(&state);

        for c in "grumpy".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        assert_eq!(section_ids(&state), ["cats"]);
        assert_eq!(state.sections()[0].stickers.len(), 1);

        handle_event(&mut state, &Event::ClearSearch).unwrap();
        assert_eq!(section_ids(&state), before);
    }

    #[test]
    fn thumbnails_activate_deactivate_and_reactivate() {
        let items: Vec<(String, String)> = (0..120).map(|i| (format!("s{i}"), format!("sticker {i}"))).collect();
        let items: Vec<(&str, &str)> = items.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let host = ScriptedHost::new().index(&["big"]).pack("big", &items);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);

        let first = ElementId::cell("big", "s0");
        assert!(state.lazy.is_loaded(&first));
        let last = ElementId::cell("big", "s119");
        assert!(!state.lazy.is_loaded(&last));

        handle_event(&mut state, &Event::ScrollList(1_000)).unwrap();
        assert!(!state.lazy.is_loaded(&first));
        assert!(state.lazy.is_loaded(&last));

        handle_event(&mut state, &Event::ScrollList(-1_000)).unwrap();
        let slot = state.lazy.slot(&first).unwrap();
        assert!(slot.loaded);
        assert_eq!(slot.activations, 2);
    }

    #[test]
    fn repeated_item_id_in_one_pack_shares_an_image_slot() {
        let host = ScriptedHost::new()
            .index(&["twice"])
            .pack("twice", &[("dup", "first"), ("dup", "second"), ("x1", "other")]);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);

        assert_eq!(state.sections()[1].stickers.len(), 3);
        assert_eq!(state.lazy.len(), 2);
        assert!(state.lazy.is_loaded(&ElementId::cell("twice", "dup")));
    }

    #[test]
    fn nav_strip_follows_leftmost_newly_visible_section() {
        let names: Vec<String> = (0..10).map(|i| format!("pack-{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut host = ScriptedHost::new().index(&refs);
        for name in &names {
            host = host.pack(name, &[("x1", "one"), ("x2", "two"), ("x3", "three"), ("x4", "four")]);
        }
        let mut state = state();
        host.drive(&mut state, &Event::Reload);

        handle_event(&mut state, &Event::JumpToSection("pack-09".into())).unwrap();
        assert!(state.nav_scroll > 0);
        assert!(state.nav.is_visible("pack-09"));

        handle_event(&mut state, &Event::JumpToSection("pack-00".into())).unwrap();
        let leftmost = state.nav_layout.get("pack-00").unwrap().bounds.x;
        assert_eq!(state.nav_scroll, leftmost);
    }

    #[test]
    fn picking_emits_item_and_persists_usage() {
        let host = ScriptedHost::new().index(&["cats"]).pack("cats", &[("c1", "cat")]);
        let mut state = state();
        host.drive(&mut state, &Event::Reload);

        handle_event(&mut state, &Event::CursorDown).unwrap();
        let actions = host.drive(&mut state, &Event::SendSelected);

        let Some(Action::EmitItem { payload }) = actions.iter().find(|a| matches!(a, Action::EmitItem { .. })) else {
            panic!("expected an emitted item");
        };
        assert_eq!(payload.url, "mxc://x/c1");
        assert!(saved_snapshot(&actions).is_some());
        assert_eq!(state.sections()[0].stickers[0].id, "c1");
    }

    #[test]
    fn failed_configuration_shows_error_until_reload() {
        let mut state = state();
        state.fail("bad packs_url");
        let (_, actions) = handle_event(&mut state, &Event::PersistedStateLoaded(PersistedState::default())).unwrap();
        assert!(actions.iter().all(|a| !matches!(a, Action::Fetch(_))));
        assert_eq!(state.phase, LoadPhase::Error("bad packs_url".into()));

        let host = ScriptedHost::new().index(&[]);
        host.drive(&mut state, &Event::Reload);
        assert_eq!(state.phase, LoadPhase::Empty);
    }
}

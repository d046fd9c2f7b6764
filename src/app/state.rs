//! Application state management.
//!
//! This module defines [`AppState`], the single source of truth for the picker.
//! It owns the load cycle, the item registry and frequency cache, the pack list,
//! the search term, display settings, scroll positions and both visibility
//! observers.
//!
//! # Architecture
//!
//! `AppState` separates core data (packs, registry, frequency record, search
//! term) from derived state (the sections on screen, their geometry and the
//! navigation strip layout). Derived state is rebuilt by
//! [`refresh_view`](AppState::refresh_view) whenever core data changes, and the
//! observers are re-polled by [`sync_observers`](AppState::sync_observers)
//! after every layout or scroll change.
//!
//! # State Components
//!
//! - **Phase / Mode**: load progress and what the list area shows
//! - **Loader / Registry**: the current load cycle and its item registry
//! - **Frequency Cache**: persisted pick statistics and the displayed snapshot
//! - **Sections**: frequently-used pseudo-pack plus packs, filtered by the term
//! - **Observers**: image activation (2-row margin) and section visibility
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::app::AppState;
//! use stickerpicker::domain::ThemeName;
//! use stickerpicker::infrastructure::{index_location, packs_base};
//!
//! let base = packs_base("https://example.org/packs/").unwrap();
//! let index = index_location(&base, None).unwrap();
//! let mut state = AppState::new(base, index, ThemeName::Light);
//! let request = state.reload();
//! assert!(request.bypass_cache);
//! ```

use std::collections::HashSet;

use url::Url;

use super::actions::Action;
use super::modes::{BrowseMode, LoadPhase};
use super::settings::{settings_rows, DisplaySettings, SettingsControl};
use crate::domain::{AltSourceConfig, Item, OutboundSticker, Pack, ThemeName, DEFAULT_HOMESERVER_URL, FREQUENTLY_USED_PACK_ID};
use crate::loader::{FetchRequest, FetchResponse, LoaderStep, PackLoader};
use crate::registry::{FrequencyCache, ItemRegistry};
use crate::search;
use crate::storage::PersistedState;
use crate::ui::theme::Theme;
use crate::viewport::{
    ElementId, GeometryViewport, LazyImageLoader, NavLayout, NavSynchronizer, PageLayout, Rect, ViewportSubscription,
    VisibilityEvent, ALT_SOURCE_INDICATOR_ID, IMAGE_MARGIN, SETTINGS_SECTION_ID,
};
use crate::worker::WorkerMessage;

/// Screen row of the navigation strip.
pub const NAV_ROW: usize = 0;

/// Screen row of the search bar.
pub const SEARCH_ROW: usize = 2;

/// First screen row of the pack list window.
pub const LIST_TOP: usize = 4;

/// Screen rows below the pack list window.
pub const FOOTER_ROWS: usize = 1;

/// Rows taken by the "no matches" notice above the (empty) sections.
pub const NOTICE_HEIGHT: i32 = 2;

pub(crate) const ALT_SOURCE_LABEL: &str = "GIPHY";
pub(crate) const FREQUENTLY_USED_LABEL: &str = "Recent";
pub(crate) const SETTINGS_LABEL: &str = "Settings";

/// Keyboard selection: a cell of the sections on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Index into the sections on screen.
    pub section: usize,
    /// Index into that section's items.
    pub item: usize,
}

/// Cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Central application state container.
///
/// Mutated by the event handler in response to user input, fetch results and
/// worker responses. View models are computed on demand from it.
#[derive(Debug)]
pub struct AppState {
    /// Progress of the current load cycle.
    pub phase: LoadPhase,

    /// What the list area shows once content is available.
    pub mode: BrowseMode,

    /// Items-per-row and theme override.
    pub settings: DisplaySettings,

    /// Palette of the effective theme.
    pub theme: Theme,

    /// Packs published in the current cycle, in index order.
    pub packs: Vec<Pack>,

    /// Item registry of the current cycle.
    ///
    /// Seeded from the frequency snapshot when a cycle starts and frozen when
    /// it completes.
    pub registry: ItemRegistry,

    /// Pick statistics and the displayed frequently-used items.
    pub frequent: FrequencyCache,

    /// Search term as typed.
    ///
    /// The filtered view is always recomputed from its normalized form.
    pub search_input: String,

    /// Alternate-source credentials declared by the index.
    pub alt_source: Option<AltSourceConfig>,

    /// Homeserver sent along with picked items.
    pub homeserver_url: String,

    /// Terminal height in rows.
    pub rows: usize,

    /// Terminal width in columns.
    pub cols: usize,

    /// First content row shown in the list window.
    pub list_scroll: i32,

    /// First strip column shown in the navigation strip.
    pub nav_scroll: i32,

    /// Keyboard selection, if any.
    pub cursor: Option<Cursor>,

    /// Image slots of every rendered cell.
    pub lazy: LazyImageLoader,

    /// Indicator visibility of the navigation strip.
    pub nav: NavSynchronizer,

    /// Geometry of the sections on screen.
    pub page: PageLayout,

    /// Geometry of the navigation strip.
    pub nav_layout: NavLayout,

    packs_base: Url,
    loader: PackLoader,
    cycle: u64,
    sections: Vec<Pack>,
    image_observer: GeometryViewport,
    section_observer: GeometryViewport,
    started: bool,
}

impl AppState {
    /// Creates an idle state; nothing is fetched until persisted state arrives.
    ///
    /// # Parameters
    ///
    /// * `packs_base` - Base URL relative pack locations are joined to
    /// * `index_url` - Location of the pack index
    /// * `default_theme` - Theme used while no override is stored
    #[must_use]
    pub fn new(packs_base: Url, index_url: Url, default_theme: ThemeName) -> Self {
        let settings = DisplaySettings::new(default_theme);
        Self {
            phase: LoadPhase::Loading,
            mode: BrowseMode::Browsing,
            theme: Theme::for_name(settings.effective_theme()),
            settings,
            packs: Vec::new(),
            registry: ItemRegistry::default(),
            frequent: FrequencyCache::default(),
            search_input: String::new(),
            alt_source: None,
            homeserver_url: DEFAULT_HOMESERVER_URL.to_string(),
            rows: 0,
            cols: 0,
            list_scroll: 0,
            nav_scroll: 0,
            cursor: None,
            lazy: LazyImageLoader::default(),
            nav: NavSynchronizer::default(),
            page: PageLayout::default(),
            nav_layout: NavLayout::default(),
            loader: PackLoader::new(packs_base.clone(), index_url),
            packs_base,
            cycle: 0,
            sections: Vec::new(),
            image_observer: GeometryViewport::new(IMAGE_MARGIN),
            section_observer: GeometryViewport::new(0),
            started: false,
        }
    }

    /// Base URL relative pack locations and thumbnails resolve against.
    #[must_use]
    pub const fn packs_base(&self) -> &Url {
        &self.packs_base
    }

    /// Current load cycle token.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns whether a fetch of the current cycle is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loader.in_progress()
    }

    /// Sections on screen: the frequently-used pseudo-pack followed by every
    /// pack, or their filtered form while searching.
    #[must_use]
    pub fn sections(&self) -> &[Pack] {
        &self.sections
    }

    /// Normalized search term.
    #[must_use]
    pub fn search_term(&self) -> String {
        search::normalize(&self.search_input)
    }

    /// Returns whether a search with no surviving items is active.
    #[must_use]
    pub fn shows_no_matches(&self) -> bool {
        self.sections.is_empty() && !self.search_term().is_empty()
    }

    /// Returns whether the pack list is on screen.
    #[must_use]
    pub fn content_visible(&self) -> bool {
        self.phase.shows_content() && self.mode != BrowseMode::ViewingAlternateSource
    }

    /// Rows of the pack list window.
    #[must_use]
    pub const fn list_rows(&self) -> usize {
        self.rows.saturating_sub(LIST_TOP + FOOTER_ROWS)
    }

    /// The list window in content coordinates.
    #[must_use]
    pub fn list_viewport(&self) -> Rect {
        Rect::new(0, self.list_scroll, to_i32(self.cols), to_i32(self.list_rows()))
    }

    /// `(id, label)` of every navigation indicator, left to right.
    ///
    /// The alternate-source tab comes first when enabled, then the
    /// frequently-used section, every loaded pack and the settings section.
    /// Indicators exist for every loaded pack whether or not the search left
    /// it on screen.
    #[must_use]
    pub fn nav_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::with_capacity(self.packs.len() + 3);
        if self.alt_source.is_some() {
            entries.push((ALT_SOURCE_INDICATOR_ID.to_string(), ALT_SOURCE_LABEL.to_string()));
        }
        entries.push((FREQUENTLY_USED_PACK_ID.to_string(), FREQUENTLY_USED_LABEL.to_string()));
        entries.extend(self.packs.iter().map(|p| (p.id.clone(), p.title.clone())));
        entries.push((SETTINGS_SECTION_ID.to_string(), SETTINGS_LABEL.to_string()));
        entries
    }

    /// Item under the keyboard cursor.
    #[must_use]
    pub fn selected_item(&self) -> Option<&Item> {
        let cursor = self.cursor?;
        self.sections.get(cursor.section)?.stickers.get(cursor.item)
    }

    // ---------------------------------------------------------------------
    // Load cycle
    // ---------------------------------------------------------------------

    /// Applies persisted settings and frequency data.
    ///
    /// The first call starts the initial load cycle and returns its index
    /// request. When a cycle already started (a reload beat the worker), its
    /// registry is rebuilt from the restored snapshot plus the packs published
    /// so far, so restored items stay resolvable. If that cycle already
    /// finished, the cache is refreshed and saved again over whatever the
    /// finished cycle persisted.
    pub fn restore(&mut self, state: PersistedState) -> Vec<Action> {
        self.settings.restore(state.stickers_per_row, state.theme_override);
        self.apply_theme();
        self.frequent = FrequencyCache::new(state.frequently_used, state.frequently_used_cache);
        tracing::debug!(
            stickers_per_row = self.settings.stickers_per_row(),
            theme = %self.settings.effective_theme(),
            frequently_used = self.frequent.snapshot().len(),
            "persisted state restored"
        );

        if !self.started {
            return self.start().map(Action::Fetch).into_iter().collect();
        }

        let finished = self.registry.is_frozen();
        self.reseed_registry();
        let mut actions = Vec::new();
        if finished {
            self.frequent.refresh(&self.registry);
            actions.push(self.save_frequently_used());
        }
        self.refresh_view();
        actions
    }

    /// Rebuilds the cycle's registry: frequency snapshot first, then every
    /// published pack in order, frozen again if it was.
    fn reseed_registry(&mut self) {
        let frozen = self.registry.is_frozen();
        let mut registry = ItemRegistry::seeded(self.cycle, self.frequent.snapshot().iter().cloned());
        for pack in &self.packs {
            if let Err(e) = registry.register_pack(pack) {
                tracing::warn!(pack = %pack.id, error = %e, "pack not re-registered");
            }
        }
        if frozen {
            registry.freeze();
        }
        self.registry = registry;
    }

    /// Starts the initial load cycle unless it already started.
    pub fn start(&mut self) -> Option<FetchRequest> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.start_cycle(false))
    }

    /// Abandons the current cycle and starts a new one bypassing HTTP caches.
    ///
    /// Observers are disconnected before any state is reset.
    pub fn reload(&mut self) -> FetchRequest {
        self.started = true;
        self.start_cycle(true)
    }

    /// Shows `message` on the error screen and keeps the initial cycle from
    /// starting. A reload still retries.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.started = true;
        self.phase = LoadPhase::Error(message.into());
    }

    fn start_cycle(&mut self, bypass_cache: bool) -> FetchRequest {
        self.disconnect_observers();

        self.cycle += 1;
        self.packs.clear();
        self.search_input.clear();
        self.cursor = None;
        self.list_scroll = 0;
        self.nav_scroll = 0;
        self.phase = LoadPhase::Loading;
        self.registry = ItemRegistry::seeded(self.cycle, self.frequent.snapshot().iter().cloned());
        tracing::info!(cycle = self.cycle, bypass_cache, "load cycle started");

        self.refresh_view();
        self.loader.start(self.cycle, bypass_cache)
    }

    /// Feeds a fetch result into the load cycle.
    ///
    /// Returns `None` when the response is stale and nothing changed,
    /// otherwise the follow-up actions (next fetch, frequency persistence).
    pub fn apply_fetch(&mut self, response: FetchResponse) -> Option<Vec<Action>> {
        let step = self.loader.advance(response, &mut self.registry, &mut self.packs);
        let finished = step.is_final();
        let mut actions = Vec::new();

        match step {
            LoaderStep::Stale => return None,
            LoaderStep::NotConfigured => self.phase = LoadPhase::Empty,
            LoaderStep::Failed(e) => {
                tracing::warn!(cycle = self.cycle, error = %e, "load cycle failed");
                self.phase = LoadPhase::Error(e.to_string());
            }
            LoaderStep::IndexLoaded { index, next } => {
                self.alt_source = index.alt_source();
                index.homeserver().clone_into(&mut self.homeserver_url);
                if self.alt_source.is_none() && self.mode == BrowseMode::ViewingAlternateSource {
                    self.mode = BrowseMode::Browsing;
                }
                actions.extend(next.map(Action::Fetch));
            }
            LoaderStep::PackPublished { position, next } => {
                if self.phase == LoadPhase::Loading {
                    tracing::debug!(position, "first pack published");
                    self.phase = LoadPhase::Ready;
                }
                actions.extend(next.map(Action::Fetch));
            }
        }

        if finished && matches!(self.phase, LoadPhase::Loading | LoadPhase::Ready) {
            self.phase = if self.packs.is_empty() {
                LoadPhase::Empty
            } else {
                LoadPhase::Ready
            };
            self.frequent.refresh(&self.registry);
            actions.push(self.save_frequently_used());
        }

        self.refresh_view();
        Some(actions)
    }

    fn save_frequently_used(&self) -> Action {
        Action::PostToWorker(WorkerMessage::save_frequently_used(
            self.frequent.record().clone(),
            self.frequent.snapshot().to_vec(),
        ))
    }

    // ---------------------------------------------------------------------
    // Derived view and observers
    // ---------------------------------------------------------------------

    /// Recomputes the sections on screen, their layout and the observers.
    pub fn refresh_view(&mut self) {
        let term = self.search_term();
        let frequent = self.frequent.as_pack();
        self.sections = if term.is_empty() {
            std::iter::once(frequent).chain(self.packs.iter().cloned()).collect()
        } else {
            search::filter(&term, std::iter::once(&frequent).chain(&self.packs))
        };

        if self.mode != BrowseMode::ViewingAlternateSource {
            self.mode = if term.is_empty() {
                BrowseMode::Browsing
            } else {
                BrowseMode::Searching
            };
        }

        self.clamp_cursor();
        self.relayout();
    }

    fn relayout(&mut self) {
        let top = if self.shows_no_matches() { NOTICE_HEIGHT } else { 0 };
        self.page = PageLayout::compute_below(top, &self.sections, self.settings.stickers_per_row(), self.cols);

        let entries = self.nav_entries();
        self.nav_layout = NavLayout::compute(entries.iter().map(|(id, label)| (id.as_str(), label.as_str())));

        self.clamp_scroll();
        self.sync_observers();
    }

    fn clamp_scroll(&mut self) {
        self.list_scroll = self.list_scroll.clamp(0, self.page.max_scroll(self.list_rows()));
        self.nav_scroll = self.nav_scroll.clamp(0, self.nav_layout.max_scroll(self.cols));
    }

    /// Subscribes every rendered section and cell, drops the rest, polls both
    /// observers and applies their batches.
    ///
    /// Sections that stop being rendered are reported to the navigation strip
    /// as having left the viewport.
    pub fn sync_observers(&mut self) {
        let _span = tracing::trace_span!("sync_observers", list_scroll = self.list_scroll).entered();
        let mut wanted: HashSet<ElementId> = HashSet::new();

        if self.content_visible() {
            for (geometry, pack) in self.page.sections.iter().zip(&self.sections) {
                let section = ElementId::Section(geometry.pack_id.clone());
                self.section_observer.subscribe(section.clone(), geometry.bounds);
                wanted.insert(section);

                for (cell, item) in geometry.cells.iter().zip(&pack.stickers) {
                    let element = ElementId::cell(geometry.pack_id.as_str(), cell.item_id.as_str());
                    self.lazy.attach(element.clone(), item.thumbnail_src(&self.packs_base));
                    self.image_observer.subscribe(element.clone(), cell.bounds);
                    wanted.insert(element);
                }
            }
            let settings = ElementId::Section(SETTINGS_SECTION_ID.to_string());
            self.section_observer.subscribe(settings.clone(), self.page.settings);
            wanted.insert(settings);
        }

        for element in self.image_observer.observed() {
            if !wanted.contains(&element) {
                self.image_observer.unsubscribe(&element);
                self.lazy.forget(&element);
            }
        }

        let mut section_batch = Vec::new();
        for element in self.section_observer.observed() {
            if !wanted.contains(&element) {
                self.section_observer.unsubscribe(&element);
                section_batch.push(VisibilityEvent::left(element));
            }
        }

        let viewport = self.list_viewport();
        let image_batch = self.image_observer.poll(viewport);
        self.lazy.apply(&image_batch);

        section_batch.extend(self.section_observer.poll(viewport));
        let correction = self.nav.apply(&section_batch, &self.nav_layout, self.nav_scroll, self.cols);
        if let Some(offset) = correction.and_then(|c| c.scroll_offset(&self.nav_layout, self.cols)) {
            self.nav_scroll = offset;
        }
    }

    fn disconnect_observers(&mut self) {
        self.image_observer.disconnect();
        self.section_observer.disconnect();
        self.lazy.disconnect();
        self.nav.disconnect();
    }

    /// Updates the terminal size; returns whether it changed.
    pub fn resize(&mut self, rows: usize, cols: usize) -> bool {
        if (self.rows, self.cols) == (rows, cols) {
            return false;
        }
        self.rows = rows;
        self.cols = cols;
        self.relayout();
        true
    }

    // ---------------------------------------------------------------------
    // Search and tabs
    // ---------------------------------------------------------------------

    /// Appends a character to the search term.
    pub fn push_search_char(&mut self, c: char) -> bool {
        if !self.content_visible() {
            return false;
        }
        self.search_input.push(c);
        self.on_search_changed();
        true
    }

    /// Removes the last character of the search term.
    pub fn pop_search_char(&mut self) -> bool {
        if !self.content_visible() || self.search_input.pop().is_none() {
            return false;
        }
        self.on_search_changed();
        true
    }

    /// Clears the search term, restoring the unfiltered view.
    pub fn clear_search(&mut self) -> bool {
        if self.search_input.is_empty() {
            return false;
        }
        self.search_input.clear();
        self.on_search_changed();
        true
    }

    fn on_search_changed(&mut self) {
        tracing::trace!(query = %self.search_input, "search term updated");
        self.cursor = None;
        self.list_scroll = 0;
        self.refresh_view();
    }

    /// Switches between the pack list and the alternate-source tab.
    ///
    /// Opening the tab clears the search. No-op unless the index enabled the
    /// alternate source and content is available.
    pub fn toggle_alternate_source(&mut self) -> bool {
        if self.mode == BrowseMode::ViewingAlternateSource {
            self.mode = BrowseMode::Browsing;
            self.refresh_view();
            return true;
        }
        self.show_alternate_source()
    }

    /// Opens the alternate-source tab.
    pub fn show_alternate_source(&mut self) -> bool {
        if self.alt_source.is_none() || !self.phase.shows_content() {
            return false;
        }
        self.mode = BrowseMode::ViewingAlternateSource;
        self.search_input.clear();
        self.cursor = None;
        self.refresh_view();
        true
    }

    // ---------------------------------------------------------------------
    // Scrolling
    // ---------------------------------------------------------------------

    /// Scrolls the list window by `delta` rows.
    pub fn scroll_list(&mut self, delta: i32) -> bool {
        let before = self.list_scroll;
        self.list_scroll = self.list_scroll.saturating_add(delta);
        self.clamp_scroll();
        if self.list_scroll == before {
            return false;
        }
        self.sync_observers();
        true
    }

    /// Scrolls the navigation strip by `delta` columns.
    pub fn scroll_nav(&mut self, delta: i32) -> bool {
        let before = self.nav_scroll;
        self.nav_scroll = self.nav_scroll.saturating_add(delta);
        self.clamp_scroll();
        self.nav_scroll != before
    }

    /// Scrolls the list so the section `id` starts at the top.
    ///
    /// Leaves the alternate-source tab first.
    pub fn jump_to_section(&mut self, id: &str) -> bool {
        if self.mode == BrowseMode::ViewingAlternateSource {
            self.mode = BrowseMode::Browsing;
            self.refresh_view();
        }
        let Some(top) = self.page.section_top(id) else {
            tracing::debug!(section = %id, "section not on screen");
            return false;
        };
        self.list_scroll = top;
        self.clamp_scroll();
        self.sync_observers();
        true
    }

    fn section_tops(&self) -> Vec<i32> {
        self.page
            .sections
            .iter()
            .map(|s| s.bounds.y)
            .chain(std::iter::once(self.page.settings.y))
            .collect()
    }

    /// Scrolls to the next section below the top of the window.
    pub fn next_section(&mut self) -> bool {
        let scroll = self.list_scroll;
        match self.section_tops().into_iter().find(|&top| top > scroll) {
            Some(top) => self.scroll_list(top - scroll),
            None => false,
        }
    }

    /// Scrolls to the previous section start above the top of the window.
    pub fn prev_section(&mut self) -> bool {
        let scroll = self.list_scroll;
        match self.section_tops().into_iter().rev().find(|&top| top < scroll) {
            Some(top) => self.scroll_list(top - scroll),
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Cursor and picking
    // ---------------------------------------------------------------------

    /// Moves the keyboard cursor, scrolling it into view.
    ///
    /// The first move places the cursor on the first item of the topmost
    /// section in the window.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        if !self.content_visible() {
            return false;
        }
        let per_row = self.settings.stickers_per_row();
        let next = match self.cursor {
            None => self.first_cursor(),
            Some(c) => match direction {
                Direction::Right => self.step_forward(c),
                Direction::Left => self.step_backward(c),
                Direction::Down => self.step_down(c, per_row),
                Direction::Up => self.step_up(c, per_row),
            },
        };
        let Some(next) = next else {
            return false;
        };
        self.cursor = Some(next);
        self.scroll_to_cursor();
        self.sync_observers();
        true
    }

    fn len_of(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |p| p.stickers.len())
    }

    fn next_nonempty(&self, from: usize) -> Option<usize> {
        (from..self.sections.len()).find(|&i| self.len_of(i) > 0)
    }

    fn prev_nonempty(&self, before: usize) -> Option<usize> {
        (0..before).rev().find(|&i| self.len_of(i) > 0)
    }

    fn first_cursor(&self) -> Option<Cursor> {
        let top = self.page.section_index_at(self.list_scroll).unwrap_or(0);
        let section = self.next_nonempty(top).or_else(|| self.prev_nonempty(top))?;
        Some(Cursor { section, item: 0 })
    }

    fn step_forward(&self, c: Cursor) -> Option<Cursor> {
        if c.item + 1 < self.len_of(c.section) {
            return Some(Cursor { item: c.item + 1, ..c });
        }
        let section = self.next_nonempty(c.section + 1)?;
        Some(Cursor { section, item: 0 })
    }

    fn step_backward(&self, c: Cursor) -> Option<Cursor> {
        if c.item > 0 {
            return Some(Cursor { item: c.item - 1, ..c });
        }
        let section = self.prev_nonempty(c.section)?;
        Some(Cursor {
            section,
            item: self.len_of(section) - 1,
        })
    }

    fn step_down(&self, c: Cursor, per_row: usize) -> Option<Cursor> {
        let len = self.len_of(c.section);
        if c.item + per_row < len {
            return Some(Cursor { item: c.item + per_row, ..c });
        }
        if c.item / per_row < (len - 1) / per_row {
            return Some(Cursor { item: len - 1, ..c });
        }
        let section = self.next_nonempty(c.section + 1)?;
        Some(Cursor {
            section,
            item: (c.item % per_row).min(self.len_of(section) - 1),
        })
    }

    fn step_up(&self, c: Cursor, per_row: usize) -> Option<Cursor> {
        if c.item >= per_row {
            return Some(Cursor { item: c.item - per_row, ..c });
        }
        let section = self.prev_nonempty(c.section)?;
        let len = self.len_of(section);
        let last_row_start = (len - 1) / per_row * per_row;
        Some(Cursor {
            section,
            item: (last_row_start + c.item % per_row).min(len - 1),
        })
    }

    fn clamp_cursor(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let len = self.len_of(cursor.section);
        self.cursor = (len > 0).then(|| Cursor {
            section: cursor.section,
            item: cursor.item.min(len - 1),
        });
    }

    fn scroll_to_cursor(&mut self) {
        let Some(bounds) = self
            .cursor
            .and_then(|c| self.page.sections.get(c.section)?.cells.get(c.item))
            .map(|cell| cell.bounds)
        else {
            return;
        };
        let rows = to_i32(self.list_rows());
        if bounds.y < self.list_scroll {
            self.list_scroll = bounds.y;
        } else if bounds.bottom() > self.list_scroll + rows {
            self.list_scroll = bounds.bottom() - rows;
        }
        self.clamp_scroll();
    }

    /// Picks the item under the keyboard cursor.
    pub fn send_selected(&mut self) -> Vec<Action> {
        match self.cursor {
            Some(cursor) if self.content_visible() => self.pick(cursor),
            _ => Vec::new(),
        }
    }

    /// Records a pick and emits the item.
    ///
    /// The registry entry wins over the displayed copy so the host receives
    /// the item as the latest pack defines it.
    fn pick(&mut self, target: Cursor) -> Vec<Action> {
        let Some(shown) = self
            .sections
            .get(target.section)
            .and_then(|p| p.stickers.get(target.item))
        else {
            return Vec::new();
        };
        let item = self.registry.resolve(&shown.id).unwrap_or(shown).clone();
        tracing::info!(id = %item.id, "item picked");

        self.frequent
            .record_use(&item.id, chrono::Utc::now().timestamp_millis(), &self.registry);
        let save = self.save_frequently_used();
        let payload = OutboundSticker::new(&item, &self.homeserver_url);
        self.refresh_view();

        vec![save, Action::EmitItem { payload }]
    }

    // ---------------------------------------------------------------------
    // Mouse
    // ---------------------------------------------------------------------

    /// Handles a left click at screen position (`line`, `col`).
    ///
    /// Returns whether a render is needed and the actions to run.
    pub fn click(&mut self, line: usize, col: usize) -> (bool, Vec<Action>) {
        if !self.phase.shows_content() {
            return (false, Vec::new());
        }
        let x = to_i32(col);

        if line == NAV_ROW {
            let Some(id) = self
                .nav_layout
                .indicator_at(x + self.nav_scroll)
                .map(|indicator| indicator.id.clone())
            else {
                return (false, Vec::new());
            };
            if id == ALT_SOURCE_INDICATOR_ID {
                return (self.show_alternate_source(), Vec::new());
            }
            return (self.jump_to_section(&id), Vec::new());
        }

        if line < LIST_TOP || line >= LIST_TOP + self.list_rows() || !self.content_visible() {
            return (false, Vec::new());
        }
        let y = to_i32(line - LIST_TOP) + self.list_scroll;

        if self.page.settings.contains(x, y) {
            let offset = y - self.page.settings.y;
            let control = settings_rows(&self.settings)
                .into_iter()
                .find(|row| row.offset == offset)
                .and_then(|row| row.control_at(x));
            return match control {
                Some(SettingsControl::Reload) => (true, vec![Action::Fetch(self.reload())]),
                Some(SettingsControl::StickersPerRow(n)) => (true, self.set_stickers_per_row(n).into_iter().collect()),
                Some(SettingsControl::Theme(theme)) => (true, vec![self.set_theme(theme)]),
                None => (false, Vec::new()),
            };
        }

        let Some((section, item)) = self.page.cell_at(x, y) else {
            return (false, Vec::new());
        };
        let target = Cursor { section, item };
        self.cursor = Some(target);
        (true, self.pick(target))
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Sets items-per-row and scrolls to the bottom of the list.
    ///
    /// Returns the persistence action, or `None` when the value is unchanged.
    pub fn set_stickers_per_row(&mut self, value: usize) -> Option<Action> {
        let before = self.settings.stickers_per_row();
        let after = self.settings.set_stickers_per_row(value);
        (before != after).then(|| self.on_stickers_per_row_changed(after))
    }

    /// Moves items-per-row by `delta`.
    pub fn adjust_stickers_per_row(&mut self, delta: i32) -> Option<Action> {
        let before = self.settings.stickers_per_row();
        let after = self.settings.adjust_stickers_per_row(delta);
        (before != after).then(|| self.on_stickers_per_row_changed(after))
    }

    fn on_stickers_per_row_changed(&mut self, value: usize) -> Action {
        tracing::debug!(stickers_per_row = value, "stickers per row changed");
        self.relayout();
        self.list_scroll = self.page.max_scroll(self.list_rows());
        self.sync_observers();
        Action::PostToWorker(WorkerMessage::save_stickers_per_row(value))
    }

    /// Sets or clears the theme override.
    pub fn set_theme(&mut self, theme: Option<ThemeName>) -> Action {
        self.settings.set_theme(theme);
        self.apply_theme();
        Action::PostToWorker(WorkerMessage::save_theme_override(theme))
    }

    /// Overrides with the next theme.
    pub fn cycle_theme(&mut self) -> Action {
        let theme = self.settings.cycle_theme();
        self.apply_theme();
        Action::PostToWorker(WorkerMessage::save_theme_override(Some(theme)))
    }

    fn apply_theme(&mut self) {
        let name = self.settings.effective_theme();
        if self.theme.name != name.as_str() {
            self.theme = Theme::for_name(name);
        }
    }
}

pub(crate) fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PickerError;
    use crate::infrastructure::{index_location, packs_base};
    use crate::registry::FrequencyRecord;

    fn state() -> AppState {
        let base = packs_base("https://example.org/packs/").unwrap();
        let index = index_location(&base, None).unwrap();
        let mut state = AppState::new(base, index, ThemeName::Light);
        state.resize(24, 40);
        state
    }

    fn pack_body(id: &str, items: &[&str]) -> String {
        let stickers: Vec<String> = items
            .iter()
            .map(|item| format!(r#"{{"id":"{item}","url":"mxc://x/{item}","body":"{item} sticker"}}"#))
            .collect();
        format!(r#"{{"id":"{id}","title":"{id}","stickers":[{}]}}"#, stickers.join(","))
    }

    /// Drives a full cycle serving `packs` in order; returns the final actions.
    fn load(state: &mut AppState, packs: &[(&str, &[&str])]) -> Vec<Action> {
        let request = state.start().unwrap_or_else(|| state.reload());
        let locations: Vec<String> = packs.iter().map(|(id, _)| format!("\"{id}.json\"")).collect();
        let index = format!(r#"{{"packs":[{}]}}"#, locations.join(","));
        let mut actions = state
            .apply_fetch(FetchResponse::for_request(&request, 200, index))
            .unwrap();
        for (id, items) in packs {
            let Some(Action::Fetch(next)) = actions.first().cloned() else {
                panic!("expected a fetch for {id}");
            };
            actions = state
                .apply_fetch(FetchResponse::for_request(&next, 200, pack_body(id, items)))
                .unwrap();
        }
        actions
    }

    #[test]
    fn first_restore_starts_loading_once() {
        let mut state = state();
        assert!(matches!(
            state.restore(PersistedState::default()).as_slice(),
            [Action::Fetch(_)]
        ));
        assert!(state.restore(PersistedState::default()).is_empty());
        assert!(state.is_loading());
    }

    #[test]
    fn ready_after_first_pack_and_frequency_saved_at_end() {
        let mut state = state();
        let request = state.start().unwrap();
        let actions = state
            .apply_fetch(FetchResponse::for_request(&request, 200, r#"{"packs":["a.json","b.json"]}"#))
            .unwrap();
        assert_eq!(state.phase, LoadPhase::Loading);

        let Some(Action::Fetch(first)) = actions.first().cloned() else {
            panic!("expected pack fetch");
        };
        let actions = state
            .apply_fetch(FetchResponse::for_request(&first, 200, pack_body("a", &["a1"])))
            .unwrap();
        assert_eq!(state.phase, LoadPhase::Ready);
        assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));

        let Some(Action::Fetch(second)) = actions.first().cloned() else {
            panic!("expected pack fetch");
        };
        let actions = state
            .apply_fetch(FetchResponse::for_request(&second, 200, pack_body("b", &["b1"])))
            .unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::SaveFrequentlyUsed { .. })]
        ));
        assert!(state.registry.is_frozen());
    }

    #[test]
    fn unfiltered_sections_lead_with_frequently_used() {
        let mut state = state();
        load(&mut state, &[("a", &["a1"]), ("b", &[])]);
        let ids: Vec<&str> = state.sections().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, [FREQUENTLY_USED_PACK_ID, "a", "b"]);
    }

    #[test]
    fn search_is_revertible() {
        let mut state = state();
        load(&mut state, &[("a", &["cat", "dog"]), ("b", &["bird"])]);
        let before = state.sections().to_vec();

        for c in "CAT".chars() {
            state.push_search_char(c);
        }
        assert_eq!(state.mode, BrowseMode::Searching);
        assert_eq!(state.sections().len(), 1);
        assert_eq!(state.sections()[0].stickers.len(), 1);

        state.clear_search();
        assert_eq!(state.mode, BrowseMode::Browsing);
        assert_eq!(state.sections(), before.as_slice());
        assert_eq!(state.packs.len(), 2);
    }

    #[test]
    fn unmatched_search_shows_notice() {
        let mut state = state();
        load(&mut state, &[("a", &["cat"])]);
        state.push_search_char('z');
        assert!(state.shows_no_matches());
        assert_eq!(state.page.settings.y, NOTICE_HEIGHT);
    }

    #[test]
    fn failed_pack_shows_error_and_skips_frequency_save() {
        let mut state = state();
        let request = state.start().unwrap();
        let actions = state
            .apply_fetch(FetchResponse::for_request(&request, 200, r#"{"packs":["a.json"]}"#))
            .unwrap();
        let Some(Action::Fetch(next)) = actions.first().cloned() else {
            panic!("expected pack fetch");
        };
        let actions = state.apply_fetch(FetchResponse::for_request(&next, 503, "")).unwrap();
        assert!(actions.is_empty());
        let LoadPhase::Error(message) = &state.phase else {
            panic!("expected error phase");
        };
        assert!(message.contains("Service Unavailable"));
    }

    #[test]
    fn picking_records_use_and_emits() {
        let mut state = state();
        load(&mut state, &[("a", &["cat"])]);
        let before = state.frequent.record().get("cat").map_or(0, |e| e.count);

        assert!(state.move_cursor(Direction::Right));
        assert_eq!(state.selected_item().map(|i| i.id.as_str()), Some("cat"));
        let actions = state.send_selected();

        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::SaveFrequentlyUsed { .. }), Action::EmitItem { .. }]
        ));
        let Action::EmitItem { payload } = &actions[1] else {
            unreachable!();
        };
        assert_eq!(payload.url, "mxc://x/cat");
        assert_eq!(payload.homeserver_url, DEFAULT_HOMESERVER_URL);
        assert_eq!(state.frequent.record().get("cat").map(|e| e.count), Some(before + 1));
        assert_eq!(state.sections()[0].stickers[0].id, "cat");
    }

    #[test]
    fn cursor_walks_grid_and_crosses_sections() {
        let mut state = state();
        state.settings.set_stickers_per_row(2);
        load(&mut state, &[("a", &["a1", "a2", "a3"]), ("b", &["b1", "b2"])]);

        // Frequently used is empty, so the first move lands on a1.
        state.move_cursor(Direction::Down);
        assert_eq!(state.selected_item().unwrap().id, "a1");
        state.move_cursor(Direction::Right);
        state.move_cursor(Direction::Down);
        assert_eq!(state.selected_item().unwrap().id, "a3");
        state.move_cursor(Direction::Down);
        assert_eq!(state.selected_item().unwrap().id, "b1");
        state.move_cursor(Direction::Up);
        assert_eq!(state.selected_item().unwrap().id, "a3");
        state.move_cursor(Direction::Right);
        assert_eq!(state.selected_item().unwrap().id, "b1");
        state.move_cursor(Direction::Left);
        assert_eq!(state.selected_item().unwrap().id, "a3");
    }

    #[test]
    fn changing_columns_scrolls_to_bottom_and_persists() {
        let mut state = state();
        let many: Vec<String> = (0..40).map(|i| format!("s{i}")).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        load(&mut state, &[("a", &many)]);
        assert_eq!(state.list_scroll, 0);

        let action = state.set_stickers_per_row(3);
        assert_eq!(action, Some(Action::PostToWorker(WorkerMessage::save_stickers_per_row(3))));
        assert_eq!(state.list_scroll, state.page.max_scroll(state.list_rows()));
        assert!(state.list_scroll > 0);
        assert_eq!(state.set_stickers_per_row(3), None);
    }

    #[test]
    fn reload_keeps_frequency_snapshot_resolvable() {
        let mut state = state();
        let mut record = FrequencyRecord::default();
        record.record("gone", 5);
        let snapshot = vec![Item::new("gone", "mxc://x/gone", "gone")];
        state.restore(PersistedState {
            frequently_used: record,
            frequently_used_cache: snapshot,
            ..PersistedState::default()
        });
        let request = state.reload();
        state.apply_fetch(FetchResponse::for_request(&request, 200, r#"{"packs":[]}"#));

        assert_eq!(state.phase, LoadPhase::Empty);
        assert!(state.registry.resolve("gone").is_some());
        assert_eq!(state.frequent.snapshot().len(), 1);
    }

    #[test]
    fn stale_cycle_responses_are_ignored() {
        let mut state = state();
        let old = state.start().unwrap();
        let _new = state.reload();
        assert!(state
            .apply_fetch(FetchResponse::for_request(&old, 200, r#"{"packs":[]}"#))
            .is_none());
        assert_eq!(state.phase, LoadPhase::Loading);
    }

    #[test]
    fn alternate_source_tab_requires_credentials() {
        let mut state = state();
        load(&mut state, &[("a", &["cat"])]);
        assert!(!state.toggle_alternate_source());

        let request = state.reload();
        let actions = state
            .apply_fetch(FetchResponse::for_request(
                &request,
                200,
                r#"{"packs":["a.json"],"giphy_api_key":"k"}"#,
            ))
            .unwrap();
        let Some(Action::Fetch(next)) = actions.first().cloned() else {
            panic!("expected pack fetch");
        };
        state.apply_fetch(FetchResponse::for_request(&next, 200, pack_body("a", &["cat"])));
        assert_eq!(state.nav_entries()[0].0, ALT_SOURCE_INDICATOR_ID);

        state.push_search_char('c');
        assert!(state.toggle_alternate_source());
        assert_eq!(state.mode, BrowseMode::ViewingAlternateSource);
        assert!(state.search_input.is_empty());

        assert!(state.jump_to_section("a"));
        assert_eq!(state.mode, BrowseMode::Browsing);
    }

    #[test]
    fn error_message_names_reason() {
        let mut state = state();
        let request = state.start().unwrap();
        state.apply_fetch(FetchResponse::for_request(&request, 500, ""));
        let expected = PickerError::HttpStatus {
            location: request.url.clone(),
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(state.phase, LoadPhase::Error(expected.to_string()));
    }
}

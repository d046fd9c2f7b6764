//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold no
//! business logic, only display-ready data: truncated labels, highlight ranges,
//! the rows of the list window and which indicators are lit.
//!
//! # Screen Layout
//!
//! ```text
//! row 0     navigation strip
//! row 1     border
//! row 2     search bar
//! row 3     border
//! row 4..   pack list window
//! last row  footer
//! ```
//!
//! Status screens (loading, error, empty) replace everything but the footer.

use std::ops::Range;

use crate::app::settings::SettingsRow;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Navigation strip, absent on status screens.
    pub nav: Option<NavBarInfo>,

    /// Search bar, absent on status screens.
    pub search_bar: Option<SearchBarInfo>,

    /// Main area.
    pub body: BodyView,

    /// Footer information (keybindings, help text).
    pub footer: FooterInfo,
}

/// Navigation strip contents, already scrolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarInfo {
    pub indicators: Vec<NavIndicator>,
}

/// One indicator of the navigation strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavIndicator {
    pub label: String,

    /// Column of the indicator's left edge on screen; may be negative when
    /// the indicator is partly scrolled out.
    pub x: i32,

    pub width: i32,

    /// Its section intersects the list window, or its tab is open.
    pub highlighted: bool,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Search term as typed.
    pub query: String,

    /// Shown when `query` is empty.
    pub placeholder: String,
}

/// What fills the area between the chrome rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyView {
    /// Loading, error or empty screen.
    Status(StatusScreen),

    /// The alternate-source tab.
    AlternateSource(AltSourcePanel),

    /// One entry per row of the list window.
    List(Vec<ListLine>),
}

/// Kind of status screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Error,
    Empty,
}

/// Centered status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusScreen {
    pub kind: StatusKind,

    /// Primary message (e.g., "No packs found").
    pub message: String,

    /// Secondary text, such as the failure reason.
    pub subtitle: String,
}

/// The alternate-source tab contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltSourcePanel {
    pub title: String,
    pub lines: Vec<String>,
}

/// One row of the list window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLine {
    Blank,

    /// Notice shown above the sections, such as "no matches".
    Notice(String),

    SectionTitle(String),

    /// One grid row of item cells.
    Cells(Vec<DisplayCell>),

    /// One row of the settings section.
    Settings(SettingsRow),
}

/// Display information for one item cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
    /// Label, already truncated to fit.
    pub label: String,

    /// Columns the cell occupies.
    pub width: usize,

    /// Whether the thumbnail is active.
    pub loaded: bool,

    pub is_selected: bool,

    /// Character range of `label` matching the search term.
    pub highlight: Option<Range<usize>>,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}

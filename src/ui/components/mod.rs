//! Composable UI component renderers.
//!
//! Each component is responsible for rendering a specific part of the
//! interface at absolute, 1-indexed terminal rows.
//!
//! # Components
//!
//! - `nav`: Navigation strip with one indicator per section
//! - `search`: Search input line
//! - `list`: Pack list window (titles, item grids, settings)
//! - `alt`: Alternate-source tab
//! - `status`: Loading, error and empty screens
//! - `footer`: Help text and keybinding hints
//!
//! # Layout
//!
//! [`render_content_mode`] draws the full picker:
//!
//! ```text
//! [Navigation strip]
//! [Border]
//! [Search bar]
//! [Border]
//! [Pack list window / alternate-source tab]
//! [Footer]
//! ```

mod alt;
mod footer;
mod list;
mod nav;
mod search;
mod status;

pub use status::render_status;

use crate::app::state::{FOOTER_ROWS, LIST_TOP, NAV_ROW, SEARCH_ROW};
use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BodyView, UIViewModel};

use alt::render_alt_panel;
use footer::render_footer;
use list::render_list;
use nav::render_nav;
use search::render_search_bar;

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the picker with content available.
///
/// Screen rows of the app layer are 0-indexed; terminal rows are 1-indexed.
pub fn render_content_mode(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    if let Some(nav) = &vm.nav {
        render_nav(NAV_ROW + 1, nav, theme, cols);
    }
    render_border(NAV_ROW + 2, &theme.colors.border, cols);

    match &vm.search_bar {
        Some(search) => {
            render_search_bar(SEARCH_ROW + 1, search, theme, cols);
        }
        None => {
            position_cursor(SEARCH_ROW + 1, 1);
            print!("{}", " ".repeat(cols));
        }
    }
    render_border(SEARCH_ROW + 2, &theme.colors.border, cols);

    let list_height = rows.saturating_sub(LIST_TOP + FOOTER_ROWS);
    match &vm.body {
        BodyView::List(lines) => render_list(LIST_TOP + 1, lines, theme, cols),
        BodyView::AlternateSource(panel) => render_alt_panel(LIST_TOP + 1, list_height, panel, theme, cols),
        BodyView::Status(status) => render_status(status, theme, rows, cols),
    }

    render_footer(rows, &vm.footer, theme, cols);
}

/// Renders a status screen with the footer.
pub fn render_status_mode(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    if let BodyView::Status(status) = &vm.body {
        render_status(status, theme, rows, cols);
    }
    render_footer(rows, &vm.footer, theme, cols);
}

//! Search bar component renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

const PROMPT: &str = " Search: ";

/// Renders the one-line search input at the specified row.
///
/// Shows the query as typed followed by a block cursor, or the dimmed
/// placeholder when the query is empty.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let inner = cols.saturating_sub(PROMPT.chars().count());

    position_cursor(row, 1);
    print!("{}{PROMPT}{}", Theme::fg(&theme.colors.search_bar_border), Theme::reset());
    if search.query.is_empty() {
        print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
        print!("{}", fit(&search.placeholder, inner));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("{}", fit(&format!("{}█", search.query), inner));
    }
    print!("{}", Theme::reset());
    row + 1
}

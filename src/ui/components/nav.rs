//! Navigation strip component renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::NavBarInfo;

/// Renders the navigation strip at the specified row.
///
/// Indicators arrive already shifted by the strip's scroll offset; parts
/// falling outside `0..cols` are cut.
pub fn render_nav(row: usize, nav: &NavBarInfo, theme: &Theme, cols: usize) -> usize {
    let width = i32::try_from(cols).unwrap_or(i32::MAX);

    position_cursor(row, 1);
    print!("{}", " ".repeat(cols));

    for indicator in &nav.indicators {
        let text: Vec<char> = format!(" {} ", indicator.label).chars().collect();
        let start = indicator.x.max(0);
        let end = (indicator.x + indicator.width).min(width);
        if start >= end {
            continue;
        }
        let skip = usize::try_from(start - indicator.x).unwrap_or(0);
        let take = usize::try_from(end - start).unwrap_or(0);
        let visible: String = text.iter().skip(skip).take(take).collect();

        position_cursor(row, usize::try_from(start).unwrap_or(0) + 1);
        if indicator.highlighted {
            print!("{}", Theme::fg(&theme.colors.nav_visible_fg));
            print!("{}", Theme::bg(&theme.colors.nav_visible_bg));
            print!("{}", Theme::bold());
        } else {
            print!("{}", Theme::fg(&theme.colors.nav_fg));
        }
        print!("{visible}{}", Theme::reset());
    }
    row + 1
}

//! Alternate-source tab renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::AltSourcePanel;

/// Renders the alternate-source panel in `height` rows starting at `row`.
pub fn render_alt_panel(row: usize, height: usize, panel: &AltSourcePanel, theme: &Theme, cols: usize) {
    let lines = std::iter::once((panel.title.as_str(), &theme.colors.title_fg))
        .chain(std::iter::once(("", &theme.colors.text_normal)))
        .chain(panel.lines.iter().map(|l| (l.as_str(), &theme.colors.text_normal)))
        .chain(std::iter::repeat(("", &theme.colors.text_normal)))
        .take(height);

    for (offset, (text, color)) in lines.enumerate() {
        position_cursor(row + offset, 1);
        print!("{}", Theme::fg(color));
        print!("{}", fit(&format!("  {text}"), cols));
        print!("{}", Theme::reset());
    }
}

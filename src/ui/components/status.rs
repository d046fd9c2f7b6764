//! Status screen component renderer.
//!
//! Loading, error and empty screens replace the whole picker with a centered
//! message.

use crate::ui::helpers::{center, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{StatusKind, StatusScreen};

/// Renders a centered two-line status message.
///
/// ```text
/// [blank lines]
///        MESSAGE
///        subtitle
/// ```
///
/// The message sits a third of the way down the screen. Errors use
/// `error_fg`, everything else `empty_state_fg`.
pub fn render_status(status: &StatusScreen, theme: &Theme, rows: usize, cols: usize) {
    let row = (rows / 3).max(1);
    let color = match status.kind {
        StatusKind::Error => &theme.colors.error_fg,
        StatusKind::Loading | StatusKind::Empty => &theme.colors.empty_state_fg,
    };

    position_cursor(row, 1);
    print!("{}{}", Theme::fg(color), Theme::bold());
    print!("{}", center(&status.message, cols));
    print!("{}", Theme::reset());

    position_cursor(row + 1, 1);
    print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    print!("{}", center(&status.subtitle, cols));
    print!("{}", Theme::reset());
}

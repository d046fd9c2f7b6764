//! Pack list window renderer.
//!
//! Draws one [`ListLine`] per screen row: section titles, grids of item cells
//! and the settings section.

use crate::app::settings::SettingsRow;
use crate::ui::helpers::{fit, highlighted_text, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayCell, ListLine};

const LOADED_MARKER: char = '■';
const PENDING_MARKER: char = '□';

/// Renders `lines` starting at `row`, one per screen row.
pub fn render_list(row: usize, lines: &[ListLine], theme: &Theme, cols: usize) {
    for (offset, line) in lines.iter().enumerate() {
        position_cursor(row + offset, 1);
        match line {
            ListLine::Blank => print!("{}", " ".repeat(cols)),
            ListLine::Notice(text) => {
                print!("{}{}", Theme::fg(&theme.colors.empty_state_fg), Theme::bold());
                print!("{}", fit(&format!("  {text}"), cols));
                print!("{}", Theme::reset());
            }
            ListLine::SectionTitle(title) => {
                print!("{}{}", Theme::fg(&theme.colors.title_fg), Theme::bold());
                print!("{}", fit(&format!(" {title}"), cols));
                print!("{}", Theme::reset());
            }
            ListLine::Cells(cells) => render_cells(cells, theme, cols),
            ListLine::Settings(settings) => render_settings_row(settings, theme, cols),
        }
    }
}

fn render_cells(cells: &[DisplayCell], theme: &Theme, cols: usize) {
    let mut used = 0;
    for cell in cells {
        print!("{}", render_cell(cell, theme));
        used += cell.width;
    }
    print!("{}", " ".repeat(cols.saturating_sub(used)));
}

/// Formats one cell: thumbnail marker, label, padding to the cell width.
fn render_cell(cell: &DisplayCell, theme: &Theme) -> String {
    let (marker, marker_color) = if cell.loaded {
        (LOADED_MARKER, &theme.colors.image_loaded_fg)
    } else {
        (PENDING_MARKER, &theme.colors.image_pending_fg)
    };

    let base = if cell.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    let label_width = cell.width.saturating_sub(3);
    let label = fit(&cell.label, label_width);
    let mut out = String::new();
    if cell.is_selected {
        out.push_str(&base);
        out.push(marker);
    } else {
        out.push_str(&Theme::fg(marker_color));
        out.push(marker);
        out.push_str(&base);
    }
    out.push(' ');
    out.push_str(&highlighted_text(&label, cell.highlight.as_ref(), theme, cell.is_selected, &base));
    out.push_str(&fit("", cell.width.saturating_sub(label_width + 2)));
    out.push_str(Theme::reset());
    out
}

fn render_settings_row(row: &SettingsRow, theme: &Theme, cols: usize) {
    let mut used = row.prefix.chars().count();
    print!("{}{}{}", Theme::fg(&theme.colors.text_dim), row.prefix, Theme::reset());

    for option in &row.options {
        let text = format!(" {} ", option.label);
        used += text.chars().count();
        if option.selected {
            print!(
                "{}{}{text}{}",
                Theme::fg(&theme.colors.selection_fg),
                Theme::bg(&theme.colors.selection_bg),
                Theme::reset()
            );
        } else {
            print!("{}{text}{}", Theme::fg(&theme.colors.text_normal), Theme::reset());
        }
    }
    print!("{}", " ".repeat(cols.saturating_sub(used)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn cell_fills_its_width() {
        let theme = Theme::default();
        let cell = DisplayCell {
            label: "cat".into(),
            width: 10,
            loaded: false,
            is_selected: false,
            highlight: Some(0..3),
        };
        let plain = strip_ansi(&render_cell(&cell, &theme));
        assert_eq!(plain.chars().count(), 10);
        assert!(plain.starts_with("□ cat"));
    }

    #[test]
    fn loaded_cells_show_filled_marker() {
        let theme = Theme::default();
        let cell = DisplayCell {
            label: "dog".into(),
            width: 8,
            loaded: true,
            is_selected: true,
            highlight: None,
        };
        assert!(strip_ansi(&render_cell(&cell, &theme)).starts_with("■ dog"));
    }
}

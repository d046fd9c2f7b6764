//! Shared rendering utilities and helpers.
//!
//! Components print ANSI-styled text at absolute positions. The helpers here
//! build the styled strings so width handling and highlighting stay testable
//! without a terminal.
//!
//! All widths and ranges count characters, not bytes.
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::ui::helpers::fit;
//!
//! assert_eq!(fit("happy cat", 5), "happy");
//! assert_eq!(fit("cat", 5), "cat  ");
//! ```

use std::ops::Range;

use crate::ui::theme::Theme;

/// Positions the cursor at a specific row and column.
///
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Pads or cuts `text` to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Centers `text` in `width` columns, cutting it when too long.
#[must_use]
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count().min(width);
    let left = (width - len) / 2;
    fit(&format!("{}{text}", " ".repeat(left)), width)
}

/// Renders `text` with the characters in `range` highlighted.
///
/// When `is_selected` is `true`, match highlighting is skipped so it does not
/// fight with the selection background; `restore` is re-applied after the
/// highlighted part otherwise.
#[must_use]
pub fn highlighted_text(
    text: &str,
    range: Option<&Range<usize>>,
    theme: &Theme,
    is_selected: bool,
    restore: &str,
) -> String {
    let Some(range) = range.filter(|_| !is_selected) else {
        return text.to_string();
    };

    let chars: Vec<char> = text.chars().collect();
    let start = range.start.min(chars.len());
    let end = range.end.clamp(start, chars.len());

    let mut out: String = chars[..start].iter().collect();
    out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
    out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
    out.extend(&chars[start..end]);
    out.push_str(Theme::reset());
    out.push_str(restore);
    out.extend(&chars[end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_counts_characters() {
        assert_eq!(fit("héllo", 3), "hél");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn center_splits_padding() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abcdef", 4), "abcd");
    }

    #[test]
    fn highlight_wraps_only_the_range() {
        let theme = Theme::default();
        let out = highlighted_text("grumpy cat", Some(&(7..10)), &theme, false, "");
        assert!(out.starts_with("grumpy "));
        assert!(out.contains(&format!("{}cat{}", Theme::bg(&theme.colors.match_highlight_bg), Theme::reset())));
    }

    #[test]
    fn selection_suppresses_highlight() {
        let theme = Theme::default();
        assert_eq!(highlighted_text("cat", Some(&(0..3)), &theme, true, ""), "cat");
    }
}

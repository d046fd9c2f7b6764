//! Theme management and ANSI escape sequence generation.
//!
//! Every [`ThemeName`] has a palette shipped as TOML next to the crate and
//! embedded at build time. Palettes are parsed on demand; a palette that fails
//! to parse is reported and replaced by a built-in neutral palette so the
//! picker always renders.
//!
//! # TOML Format
//!
//! ```toml
//! name = "dark"
//!
//! [colors]
//! text_normal = "#e6e6e6"
//! text_dim = "#8a8a8a"
//! border = "#444444"
//! title_fg = "#ffffff"
//! nav_fg = "#b0b0b0"
//! nav_visible_fg = "#111111"
//! nav_visible_bg = "#0dbd8b"
//! selection_fg = "#111111"
//! selection_bg = "#0dbd8b"
//! search_bar_border = "#0dbd8b"
//! match_highlight_fg = "#111111"
//! match_highlight_bg = "#f9e2af"
//! image_loaded_fg = "#0dbd8b"
//! image_pending_fg = "#555555"
//! empty_state_fg = "#89b4fa"
//! error_fg = "#ff5b55"
//! ```
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::domain::ThemeName;
//! use stickerpicker::ui::theme::Theme;
//!
//! let theme = Theme::from_name(ThemeName::Dark).unwrap();
//! assert_eq!(theme.name, "dark");
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{PickerError, Result, ThemeName};

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Theme name, matching [`ThemeName::as_str`].
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g., "#cdd6f4").
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Normal text color.
    pub text_normal: String,
    /// Dimmed text color (footer, settings labels).
    pub text_dim: String,

    /// Border and separator line color.
    pub border: String,

    /// Section title color.
    pub title_fg: String,

    /// Navigation indicator whose section is off screen.
    pub nav_fg: String,
    /// Navigation indicator whose section is on screen.
    pub nav_visible_fg: String,
    pub nav_visible_bg: String,

    /// Cell under the keyboard cursor, and selected settings options.
    pub selection_fg: String,
    pub selection_bg: String,

    /// Search bar border color.
    pub search_bar_border: String,
    /// Search match highlight foreground.
    pub match_highlight_fg: String,
    /// Search match highlight background.
    pub match_highlight_bg: String,

    /// Thumbnail marker of an active image.
    pub image_loaded_fg: String,
    /// Thumbnail marker of a deferred image.
    pub image_pending_fg: String,

    /// Loading and empty screen message color.
    pub empty_state_fg: String,
    /// Error screen message color.
    pub error_fg: String,
}

impl Theme {
    /// Parses the embedded palette for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Theme`] if the embedded TOML does not parse.
    pub fn from_name(name: ThemeName) -> Result<Self> {
        let toml_str = match name {
            ThemeName::Light => include_str!("../../themes/light.toml"),
            ThemeName::Dark => include_str!("../../themes/dark.toml"),
            ThemeName::Black => include_str!("../../themes/black.toml"),
        };
        Self::from_toml(toml_str)
    }

    /// Parses a palette from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Theme`] on invalid syntax or missing colors.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PickerError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Returns the palette for `name`, falling back to the built-in palette.
    #[must_use]
    pub fn for_name(name: ThemeName) -> Self {
        Self::from_name(name).unwrap_or_else(|e| {
            tracing::warn!(theme = %name, error = %e, "theme failed to load, using fallback palette");
            Self::fallback(name)
        })
    }

    fn fallback(name: ThemeName) -> Self {
        let c = |hex: &str| hex.to_string();
        Self {
            name: name.as_str().to_string(),
            colors: ThemeColors {
                text_normal: c("#d0d0d0"),
                text_dim: c("#808080"),
                border: c("#505050"),
                title_fg: c("#ffffff"),
                nav_fg: c("#a0a0a0"),
                nav_visible_fg: c("#000000"),
                nav_visible_bg: c("#0dbd8b"),
                selection_fg: c("#000000"),
                selection_bg: c("#0dbd8b"),
                search_bar_border: c("#0dbd8b"),
                match_highlight_fg: c("#000000"),
                match_highlight_bg: c("#e5c07b"),
                image_loaded_fg: c("#0dbd8b"),
                image_pending_fg: c("#505050"),
                empty_state_fg: c("#61afef"),
                error_fg: c("#e06c75"),
            },
        }
    }

    /// Converts a hex color to RGB tuple.
    ///
    /// Returns `(255, 255, 255)` (white) on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Generates an ANSI 24-bit foreground color escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// Generates an ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling (colors, bold, dim).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_name(ThemeName::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_palette_parses() {
        for name in ThemeName::ALL {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name.as_str());
        }
    }

    #[test]
    fn invalid_palette_is_a_theme_error() {
        let err = Theme::from_toml("name = \"broken\"").unwrap_err();
        assert!(matches!(err, PickerError::Theme(_)));
    }

    #[test]
    fn hex_parsing_falls_back_to_white() {
        assert_eq!(Theme::fg("#0dbd8b"), "\u{1b}[38;2;13;189;139m");
        assert_eq!(Theme::bg("zz"), "\u{1b}[48;2;255;255;255m");
    }
}

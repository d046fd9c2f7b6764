//! Display settings and the controls of the settings section.
//!
//! [`DisplaySettings`] holds the two persisted display options. The settings
//! section at the end of the pack list renders one row per [`SettingsRow`];
//! the same rows are used for hit-testing clicks, so what is drawn and what is
//! clickable never drift apart.

use crate::domain::settings::{clamp_stickers_per_row, DEFAULT_STICKERS_PER_ROW, MAX_STICKERS_PER_ROW, MIN_STICKERS_PER_ROW};
use crate::domain::ThemeName;

/// Items-per-row and theme override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    stickers_per_row: usize,
    theme_override: Option<ThemeName>,
    default_theme: ThemeName,
}

impl DisplaySettings {
    /// Creates settings with the launch default theme and no override.
    #[must_use]
    pub const fn new(default_theme: ThemeName) -> Self {
        Self {
            stickers_per_row: DEFAULT_STICKERS_PER_ROW,
            theme_override: None,
            default_theme,
        }
    }

    /// Applies persisted values, keeping current ones for absent keys.
    pub fn restore(&mut self, stickers_per_row: Option<usize>, theme_override: Option<ThemeName>) {
        if let Some(value) = stickers_per_row {
            self.stickers_per_row = clamp_stickers_per_row(value);
        }
        self.theme_override = theme_override;
    }

    #[must_use]
    pub const fn stickers_per_row(&self) -> usize {
        self.stickers_per_row
    }

    /// Sets items-per-row, clamped to the supported range.
    ///
    /// Returns the stored value.
    pub fn set_stickers_per_row(&mut self, value: usize) -> usize {
        self.stickers_per_row = clamp_stickers_per_row(value);
        self.stickers_per_row
    }

    /// Moves items-per-row by `delta`, clamped.
    pub fn adjust_stickers_per_row(&mut self, delta: i32) -> usize {
        let current = i64::try_from(self.stickers_per_row).unwrap_or(i64::MAX);
        let target = (current + i64::from(delta)).max(0);
        self.set_stickers_per_row(usize::try_from(target).unwrap_or(MAX_STICKERS_PER_ROW))
    }

    #[must_use]
    pub const fn theme_override(&self) -> Option<ThemeName> {
        self.theme_override
    }

    /// Sets the override; `None` goes back to the launch default.
    pub fn set_theme(&mut self, theme: Option<ThemeName>) {
        self.theme_override = theme;
    }

    /// Overrides with the theme after the effective one.
    ///
    /// Returns the new override.
    pub fn cycle_theme(&mut self) -> ThemeName {
        let next = self.effective_theme().next();
        self.theme_override = Some(next);
        next
    }

    /// Theme in use: the override, else the launch default.
    #[must_use]
    pub fn effective_theme(&self) -> ThemeName {
        self.theme_override.unwrap_or(self.default_theme)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new(ThemeName::default())
    }
}

/// Something clickable in the settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsControl {
    Reload,
    StickersPerRow(usize),
    Theme(Option<ThemeName>),
}

/// One selectable option of a settings row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsOption {
    pub label: String,
    pub control: SettingsControl,
    pub selected: bool,
}

/// One row of the settings section.
///
/// Options are drawn after `prefix`, each padded by one column on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRow {
    /// Row offset below the settings title.
    pub offset: i32,
    pub prefix: String,
    pub options: Vec<SettingsOption>,
}

impl SettingsRow {
    /// Finds the option drawn at column `x`.
    #[must_use]
    pub fn control_at(&self, x: i32) -> Option<SettingsControl> {
        let mut start = i32::try_from(self.prefix.chars().count()).unwrap_or(i32::MAX);
        for option in &self.options {
            let width = i32::try_from(option.label.chars().count()).unwrap_or(0) + 2;
            if (start..start + width).contains(&x) {
                return Some(option.control);
            }
            start += width;
        }
        None
    }
}

/// Rows of the settings section for the current settings.
///
/// # Example
///
/// ```rust
/// use stickerpicker::app::settings::{settings_rows, DisplaySettings, SettingsControl};
///
/// let rows = settings_rows(&DisplaySettings::default());
/// assert_eq!(rows[0].control_at(3), Some(SettingsControl::Reload));
/// ```
#[must_use]
pub fn settings_rows(settings: &DisplaySettings) -> Vec<SettingsRow> {
    let per_row = settings.stickers_per_row();
    let theme = settings.theme_override();

    let reload = SettingsRow {
        offset: 1,
        prefix: "  ".to_string(),
        options: vec![SettingsOption {
            label: "Reload".to_string(),
            control: SettingsControl::Reload,
            selected: false,
        }],
    };

    let columns = SettingsRow {
        offset: 2,
        prefix: format!("  Stickers per row: {per_row:>2} "),
        options: (MIN_STICKERS_PER_ROW..=MAX_STICKERS_PER_ROW)
            .map(|n| SettingsOption {
                label: n.to_string(),
                control: SettingsControl::StickersPerRow(n),
                selected: n == per_row,
            })
            .collect(),
    };

    let themes = SettingsRow {
        offset: 3,
        prefix: "  Theme: ".to_string(),
        options: std::iter::once(None)
            .chain(ThemeName::ALL.into_iter().map(Some))
            .map(|option| SettingsOption {
                label: option.map_or_else(|| "Default".to_string(), |t| capitalize(t.as_str())),
                control: SettingsControl::Theme(option),
                selected: option == theme,
            })
            .collect(),
    };

    vec![reload, columns, themes]
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

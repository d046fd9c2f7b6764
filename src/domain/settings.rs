//! Display setting values shared by the app and the durable store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PickerError;

/// Fewest items per grid row.
pub const MIN_STICKERS_PER_ROW: usize = 2;

/// Most items per grid row.
pub const MAX_STICKERS_PER_ROW: usize = 10;

/// Items per grid row when nothing is stored.
pub const DEFAULT_STICKERS_PER_ROW: usize = 4;

/// Clamps a stored or requested items-per-row value into range.
///
/// # Examples
///
/// ```
/// use stickerpicker::domain::settings::clamp_stickers_per_row;
///
/// assert_eq!(clamp_stickers_per_row(1), 2);
/// assert_eq!(clamp_stickers_per_row(42), 10);
/// ```
#[must_use]
pub fn clamp_stickers_per_row(value: usize) -> usize {
    value.clamp(MIN_STICKERS_PER_ROW, MAX_STICKERS_PER_ROW)
}

/// Supported color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
    Black,
}

impl ThemeName {
    /// Every theme in cycling order.
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Black];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Black => "black",
        }
    }

    /// The theme after `self` in [`ThemeName::ALL`], wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Black,
            Self::Black => Self::Light,
        }
    }

    /// Parses a theme name, falling back to [`ThemeName::Light`] for anything
    /// unsupported.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "black" => Ok(Self::Black),
            other => Err(PickerError::Config(format!("unsupported theme: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_theme_falls_back_to_light() {
        assert_eq!(ThemeName::parse_or_default("solarized"), ThemeName::Light);
        assert_eq!(ThemeName::parse_or_default(" Dark "), ThemeName::Dark);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(ThemeName::Black.next(), ThemeName::Light);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeName::Black).unwrap(), "\"black\"");
    }
}

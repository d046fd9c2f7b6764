//! Resolution of index and pack locations into fetchable URLs.
//!
//! Pack entries in the index are either absolute `http(s)` URLs, used verbatim,
//! or file names relative to the packs base URL.

use url::Url;

use crate::domain::{PickerError, Result};

/// Index file name used when no explicit index location is configured.
pub const DEFAULT_INDEX_FILE: &str = "index.json";

/// Parses the packs base URL, forcing a trailing slash.
///
/// Without the trailing slash `Url::join` would replace the last path segment
/// instead of appending to it.
///
/// # Errors
///
/// Returns [`PickerError::InvalidLocation`] when `base` is not an absolute URL.
///
/// # Examples
///
/// ```
/// use stickerpicker::infrastructure::locations::packs_base;
///
/// let base = packs_base("https://example.org/stickers").unwrap();
/// assert_eq!(base.as_str(), "https://example.org/stickers/");
/// ```
pub fn packs_base(base: &str) -> Result<Url> {
    let trimmed = base.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|e| PickerError::InvalidLocation {
        location: base.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves a location relative to the packs base URL.
///
/// # Errors
///
/// Returns [`PickerError::InvalidLocation`] when the location cannot be parsed
/// or joined.
///
/// # Examples
///
/// ```
/// use stickerpicker::infrastructure::locations::{packs_base, resolve};
///
/// let base = packs_base("https://example.org/packs/").unwrap();
/// assert_eq!(
///     resolve(&base, "cats.json").unwrap().as_str(),
///     "https://example.org/packs/cats.json"
/// );
/// assert_eq!(
///     resolve(&base, "https://cdn.example.net/dogs.json").unwrap().as_str(),
///     "https://cdn.example.net/dogs.json"
/// );
/// ```
pub fn resolve(base: &Url, location: &str) -> Result<Url> {
    let location = location.trim();
    let invalid = |e: url::ParseError| PickerError::InvalidLocation {
        location: location.to_string(),
        reason: e.to_string(),
    };

    if is_absolute_http(location) {
        Url::parse(location).map_err(invalid)
    } else {
        base.join(location).map_err(invalid)
    }
}

/// Resolves the index location.
///
/// An explicit override is resolved like any pack location; otherwise the
/// index is `index.json` under the packs base.
///
/// # Errors
///
/// Returns [`PickerError::InvalidLocation`] for unparseable locations.
pub fn index_location(base: &Url, override_location: Option<&str>) -> Result<Url> {
    match override_location.map(str::trim).filter(|s| !s.is_empty()) {
        Some(location) => resolve(base, location),
        None => resolve(base, DEFAULT_INDEX_FILE),
    }
}

fn is_absolute_http(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_locations_join_base() {
        let base = packs_base("https://example.org/a/packs").unwrap();
        assert_eq!(
            resolve(&base, "nested/p.json").unwrap().as_str(),
            "https://example.org/a/packs/nested/p.json"
        );
    }

    #[test]
    fn default_index_sits_under_base() {
        let base = packs_base("https://example.org/packs/").unwrap();
        assert_eq!(
            index_location(&base, None).unwrap().as_str(),
            "https://example.org/packs/index.json"
        );
        assert_eq!(
            index_location(&base, Some("  ")).unwrap().as_str(),
            "https://example.org/packs/index.json"
        );
    }

    #[test]
    fn override_index_is_used() {
        let base = packs_base("https://example.org/packs/").unwrap();
        assert_eq!(
            index_location(&base, Some("https://other.org/i.json")).unwrap().as_str(),
            "https://other.org/i.json"
        );
    }

    #[test]
    fn relative_base_is_rejected() {
        assert!(matches!(
            packs_base("packs/"),
            Err(PickerError::InvalidLocation { .. })
        ));
    }
}

//! Pack index document model.
//!
//! The index is the entry point of every load cycle. It lists pack locations in
//! display order and optionally carries the homeserver used to resolve media
//! references and the credentials of the alternate (GIF search) source.

use serde::{Deserialize, Serialize};

/// Homeserver assumed when the index does not declare one.
pub const DEFAULT_HOMESERVER_URL: &str = "https://matrix-client.matrix.org";

/// The top-level index document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackIndex {
    /// Pack locations in display order. Relative entries are resolved against
    /// the packs base URL.
    #[serde(default)]
    pub packs: Vec<String>,

    /// Homeserver forwarded with every emitted item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeserver_url: Option<String>,

    /// API key enabling the alternate source tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giphy_api_key: Option<String>,

    /// Media prefix the alternate source maps its results under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giphy_mxc_prefix: Option<String>,
}

impl PackIndex {
    /// Returns the alternate-source configuration when the index enables it.
    ///
    /// A blank API key counts as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use stickerpicker::domain::PackIndex;
    ///
    /// let index: PackIndex = serde_json::from_str(
    ///     r#"{"packs": [], "giphy_api_key": "k", "giphy_mxc_prefix": "mxc://giphy/"}"#,
    /// ).unwrap();
    /// assert_eq!(index.alt_source().unwrap().api_key, "k");
    /// ```
    #[must_use]
    pub fn alt_source(&self) -> Option<AltSourceConfig> {
        let api_key = self.giphy_api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(AltSourceConfig {
            api_key: api_key.to_string(),
            mxc_prefix: self.giphy_mxc_prefix.clone().unwrap_or_default(),
        })
    }

    /// Returns the declared homeserver or the public default.
    #[must_use]
    pub fn homeserver(&self) -> &str {
        self.homeserver_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_HOMESERVER_URL)
    }
}

/// Activation data for the alternate-source tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltSourceConfig {
    /// API key as declared by the index.
    pub api_key: String,
    /// Media prefix for results, possibly empty.
    pub mxc_prefix: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_index_parses() {
        let index: PackIndex = serde_json::from_str(r#"{"packs": []}"#).unwrap();
        assert!(index.packs.is_empty());
        assert!(index.alt_source().is_none());
        assert_eq!(index.homeserver(), DEFAULT_HOMESERVER_URL);
    }

    #[test]
    fn blank_api_key_disables_alt_source() {
        let index = PackIndex {
            giphy_api_key: Some("  ".into()),
            ..PackIndex::default()
        };
        assert!(index.alt_source().is_none());
    }

    #[test]
    fn declared_homeserver_is_used() {
        let index = PackIndex {
            homeserver_url: Some("https://hs.example.org".into()),
            ..PackIndex::default()
        };
        assert_eq!(index.homeserver(), "https://hs.example.org");
    }
}

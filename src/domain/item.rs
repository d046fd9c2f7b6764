//! Sticker and pack domain models.
//!
//! An [`Item`] is a single selectable sticker; a [`Pack`] is a titled, ordered
//! collection of items loaded from one pack document. Both are immutable once
//! loaded and deserialize directly from the pack document format:
//!
//! ```json
//! {
//!   "id": "cats",
//!   "title": "Cats",
//!   "stickers": [
//!     { "id": "cat-1", "url": "mxc://example.org/abc", "body": "happy cat",
//!       "thumbnail_url": "https://example.org/thumbs/abc.png" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier of the synthetic "frequently used" pseudo-pack.
pub const FREQUENTLY_USED_PACK_ID: &str = "frequently-used";

/// Display title of the synthetic "frequently used" pseudo-pack.
pub const FREQUENTLY_USED_TITLE: &str = "Frequently used";

/// A single selectable sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Globally unique, stable identifier.
    pub id: String,

    /// Primary media reference sent to the host on selection.
    pub url: String,

    /// Display label, also used for search matching.
    pub body: String,

    /// Optional precomputed thumbnail location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Opaque media metadata passed through to the host untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

impl Item {
    /// Creates an item without thumbnail or media metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use stickerpicker::Item;
    ///
    /// let item = Item::new("cat-1", "mxc://example.org/abc", "happy cat");
    /// assert!(item.thumbnail_url.is_none());
    /// ```
    pub fn new(id: impl Into<String>, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            body: body.into(),
            thumbnail_url: None,
            info: None,
        }
    }

    /// Returns the location the lazy loader activates for this item.
    ///
    /// Uses the precomputed `thumbnail_url` when present. Otherwise the
    /// thumbnail is expected at `<packs base>/thumbnails/<file>` where `<file>`
    /// is the last path segment of the media reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use stickerpicker::Item;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.org/packs/").unwrap();
    /// let item = Item::new("cat-1", "mxc://example.org/abc123", "happy cat");
    /// assert_eq!(item.thumbnail_src(&base), "https://example.org/packs/thumbnails/abc123");
    /// ```
    #[must_use]
    pub fn thumbnail_src(&self, packs_base: &Url) -> String {
        if let Some(thumbnail) = &self.thumbnail_url {
            return thumbnail.clone();
        }

        let file = self.url.rsplit('/').next().unwrap_or(&self.url);
        packs_base
            .join(&format!("thumbnails/{file}"))
            .map_or_else(|_| format!("{packs_base}thumbnails/{file}"), String::from)
    }
}

/// A named, ordered collection of items loaded from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    /// Pack identifier, used for section and indicator identity.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Items in document order.
    #[serde(default)]
    pub stickers: Vec<Item>,
}

impl Pack {
    /// Creates a pack from its parts.
    pub fn new(id: impl Into<String>, title: impl Into<String>, stickers: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            stickers,
        }
    }

    /// Builds the synthetic "frequently used" pseudo-pack.
    #[must_use]
    pub fn frequently_used(stickers: Vec<Item>) -> Self {
        Self::new(FREQUENTLY_USED_PACK_ID, FREQUENTLY_USED_TITLE, stickers)
    }

    /// Returns whether this is the frequently-used pseudo-pack.
    #[must_use]
    pub fn is_frequently_used(&self) -> bool {
        self.id == FREQUENTLY_USED_PACK_ID
    }
}

/// Payload delivered to the host when a sticker is picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundSticker {
    /// Sticker label.
    pub body: String,
    /// Media reference.
    pub url: String,
    /// Media metadata from the pack document, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
    /// Homeserver the receiver should resolve media references against.
    pub homeserver_url: String,
}

impl OutboundSticker {
    /// Builds the outbound payload for a resolved item.
    #[must_use]
    pub fn new(item: &Item, homeserver_url: &str) -> Self {
        Self {
            body: item.body.clone(),
            url: item.url.clone(),
            info: item.info.clone(),
            homeserver_url: homeserver_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_thumbnail_wins() {
        let base = Url::parse("https://example.org/packs/").unwrap();
        let mut item = Item::new("a", "mxc://example.org/abc", "a");
        item.thumbnail_url = Some("https://cdn.example.org/a.png".into());
        assert_eq!(item.thumbnail_src(&base), "https://cdn.example.org/a.png");
    }

    #[test]
    fn pack_document_deserializes_with_optional_fields() {
        let json = r#"{
            "id": "cats",
            "title": "Cats",
            "stickers": [
                {"id": "c1", "url": "mxc://x/1", "body": "one"},
                {"id": "c2", "url": "mxc://x/2", "body": "two",
                 "thumbnail_url": "https://t/2.png", "info": {"w": 256}}
            ]
        }"#;
        let pack: Pack = serde_json::from_str(json).unwrap();
        assert_eq!(pack.stickers.len(), 2);
        assert_eq!(pack.stickers[1].thumbnail_url.as_deref(), Some("https://t/2.png"));
        assert!(pack.stickers[1].info.is_some());
    }

    #[test]
    fn outbound_payload_omits_missing_info() {
        let item = Item::new("c1", "mxc://x/1", "one");
        let payload = serde_json::to_string(&OutboundSticker::new(&item, "https://hs")).unwrap();
        assert!(!payload.contains("info"));
        assert!(payload.contains("\"homeserver_url\":\"https://hs\""));
    }
}

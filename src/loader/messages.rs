//! Fetch request and response envelopes.
//!
//! Requests leave the plugin through the host's web-request facility and come
//! back as a status, a body and the context map the request was sent with. The
//! context carries everything needed to route the response: the load cycle
//! token, which document was requested and where it lives.

use std::collections::BTreeMap;

/// Context key holding the load cycle token.
const CYCLE_KEY: &str = "stickerpicker_cycle";
/// Context key holding `index` or `pack`.
const TARGET_KEY: &str = "stickerpicker_target";
/// Context key holding the pack position within the index.
const POSITION_KEY: &str = "stickerpicker_position";
/// Context key holding the resolved location.
const LOCATION_KEY: &str = "stickerpicker_location";

/// Which document a fetch is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// The pack index.
    Index,
    /// The pack at `position` in the index's `packs` list.
    Pack {
        /// Zero-based position in index order.
        position: usize,
    },
}

/// A document fetch the plugin shim should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Load cycle this request belongs to.
    pub cycle: u64,
    /// Requested document.
    pub target: FetchTarget,
    /// Fully resolved URL.
    pub url: String,
    /// Whether HTTP caches must be bypassed.
    pub bypass_cache: bool,
}

impl FetchRequest {
    /// Request headers for the host.
    ///
    /// # Examples
    ///
    /// ```
    /// use stickerpicker::loader::{FetchRequest, FetchTarget};
    ///
    /// let request = FetchRequest {
    ///     cycle: 1,
    ///     target: FetchTarget::Index,
    ///     url: "https://example.org/packs/index.json".into(),
    ///     bypass_cache: true,
    /// };
    /// assert_eq!(request.headers().get("Cache-Control").map(String::as_str), Some("no-cache"));
    /// ```
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if self.bypass_cache {
            headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        }
        headers
    }

    /// Encodes the routing information as a web-request context map.
    #[must_use]
    pub fn context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert(CYCLE_KEY.to_string(), self.cycle.to_string());
        context.insert(LOCATION_KEY.to_string(), self.url.clone());
        match self.target {
            FetchTarget::Index => {
                context.insert(TARGET_KEY.to_string(), "index".to_string());
            }
            FetchTarget::Pack { position } => {
                context.insert(TARGET_KEY.to_string(), "pack".to_string());
                context.insert(POSITION_KEY.to_string(), position.to_string());
            }
        }
        context
    }
}

/// A completed fetch, routed back to the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Load cycle the originating request belonged to.
    pub cycle: u64,
    /// Requested document.
    pub target: FetchTarget,
    /// Resolved URL that was fetched.
    pub url: String,
    /// HTTP status, or `0` when the request never got a response.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Builds a response for `request`, as a test double or transport would.
    #[must_use]
    pub fn for_request(request: &FetchRequest, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            cycle: request.cycle,
            target: request.target,
            url: request.url.clone(),
            status,
            body: body.into(),
        }
    }

    /// Decodes a host web-request result.
    ///
    /// Returns `None` when the context was not produced by
    /// [`FetchRequest::context`], in which case the result belongs to someone
    /// else and must be ignored.
    #[must_use]
    pub fn from_context(status: u16, body: Vec<u8>, context: &BTreeMap<String, String>) -> Option<Self> {
        let cycle = context.get(CYCLE_KEY)?.parse().ok()?;
        let url = context.get(LOCATION_KEY)?.clone();
        let target = match context.get(TARGET_KEY)?.as_str() {
            "index" => FetchTarget::Index,
            "pack" => FetchTarget::Pack {
                position: context.get(POSITION_KEY)?.parse().ok()?,
            },
            _ => return None,
        };
        Some(Self {
            cycle,
            target,
            url,
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_context_routes_back() {
        let request = FetchRequest {
            cycle: 7,
            target: FetchTarget::Pack { position: 2 },
            url: "https://example.org/packs/cats.json".into(),
            bypass_cache: false,
        };
        let response = FetchResponse::from_context(200, b"{}".to_vec(), &request.context()).unwrap();
        assert_eq!(response.cycle, 7);
        assert_eq!(response.target, FetchTarget::Pack { position: 2 });
        assert_eq!(response.url, request.url);
        assert!(!request.headers().contains_key("Cache-Control"));
    }

    #[test]
    fn foreign_context_is_ignored() {
        let mut context = BTreeMap::new();
        context.insert("something".to_string(), "else".to_string());
        assert!(FetchResponse::from_context(200, Vec::new(), &context).is_none());
    }
}

//! Sequential index and pack loading.
//!
//! A load cycle is a small resumable state machine:
//!
//! ```text
//! start ──> AwaitingIndex ──404──> NotConfigured
//!                │ ──error──> Failed
//!                ▼
//!          AwaitingPack(0) ──> AwaitingPack(1) ──> ... ──> Finished
//!                │ ──error──> Failed (remaining packs are skipped)
//! ```
//!
//! Only one request is ever in flight, so packs are published in index order
//! no matter how long each fetch takes. Responses tagged with another cycle,
//! or for a document the loader is not waiting on, are reported as stale.

use url::Url;

use super::messages::{FetchRequest, FetchResponse, FetchTarget};
use crate::domain::{status_text, Pack, PackIndex, PickerError, Result};
use crate::infrastructure::locations;
use crate::registry::ItemRegistry;

/// Outcome of feeding one response to the loader.
#[derive(Debug)]
pub enum LoaderStep {
    /// The response belongs to an older cycle or was not expected.
    Stale,

    /// The index does not exist; the catalog is empty but not broken.
    NotConfigured,

    /// The cycle failed and stopped.
    Failed(PickerError),

    /// The index arrived. `next` is the first pack request, or `None` when the
    /// index lists no packs and the cycle is already complete.
    IndexLoaded {
        /// Parsed index document.
        index: PackIndex,
        /// Follow-up request.
        next: Option<FetchRequest>,
    },

    /// A pack was registered and appended to the pack list. `next` is `None`
    /// once the last pack has been published.
    PackPublished {
        /// Position of the pack in the pack list.
        position: usize,
        /// Follow-up request.
        next: Option<FetchRequest>,
    },
}

impl LoaderStep {
    /// Returns whether this step ends the cycle.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        match self {
            Self::Stale => false,
            Self::NotConfigured | Self::Failed(_) => true,
            Self::IndexLoaded { next, .. } | Self::PackPublished { next, .. } => next.is_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Nothing,
    Index,
    Pack(usize),
}

/// Resumable loader for one catalog.
///
/// # Examples
///
/// ```
/// use stickerpicker::infrastructure::locations::packs_base;
/// use stickerpicker::loader::{FetchResponse, LoaderStep, PackLoader};
/// use stickerpicker::ItemRegistry;
///
/// let base = packs_base("https://example.org/packs/").unwrap();
/// let mut loader = PackLoader::new(base.clone(), base.join("index.json").unwrap());
/// let mut registry = ItemRegistry::default();
/// let mut packs = Vec::new();
///
/// let request = loader.start(1, false);
/// let step = loader.advance(FetchResponse::for_request(&request, 404, ""), &mut registry, &mut packs);
/// assert!(matches!(step, LoaderStep::NotConfigured));
/// ```
#[derive(Debug, Clone)]
pub struct PackLoader {
    packs_base: Url,
    index_url: Url,
    cycle: u64,
    bypass_cache: bool,
    locations: Vec<Url>,
    awaiting: Awaiting,
}

impl PackLoader {
    /// Creates an idle loader.
    #[must_use]
    pub const fn new(packs_base: Url, index_url: Url) -> Self {
        Self {
            packs_base,
            index_url,
            cycle: 0,
            bypass_cache: false,
            locations: Vec::new(),
            awaiting: Awaiting::Nothing,
        }
    }

    /// Begins cycle `cycle`, abandoning any cycle in progress.
    ///
    /// Returns the index request.
    pub fn start(&mut self, cycle: u64, bypass_cache: bool) -> FetchRequest {
        tracing::debug!(cycle, bypass_cache, index = %self.index_url, "starting load cycle");
        self.cycle = cycle;
        self.bypass_cache = bypass_cache;
        self.locations.clear();
        self.awaiting = Awaiting::Index;
        self.request(FetchTarget::Index, self.index_url.to_string())
    }

    /// Current cycle token.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns whether a response is still expected.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.awaiting != Awaiting::Nothing
    }

    /// Feeds one response into the cycle.
    ///
    /// Pack responses are registered into `registry` before the pack is
    /// appended to `packs`. The registry is frozen when the cycle completes.
    pub fn advance(
        &mut self,
        response: FetchResponse,
        registry: &mut ItemRegistry,
        packs: &mut Vec<Pack>,
    ) -> LoaderStep {
        let _span = tracing::debug_span!(
            "loader_advance",
            cycle = response.cycle,
            status = response.status,
            url = %response.url
        )
        .entered();

        if response.cycle != self.cycle || !self.expects(response.target) {
            tracing::debug!(current_cycle = self.cycle, "discarding stale response");
            return LoaderStep::Stale;
        }

        let step = match response.target {
            FetchTarget::Index => self.on_index(&response, registry),
            FetchTarget::Pack { position } => self.on_pack(position, &response, registry, packs),
        };

        if step.is_final() {
            self.awaiting = Awaiting::Nothing;
            registry.freeze();
            tracing::debug!(cycle = self.cycle, published = packs.len(), "load cycle finished");
        }
        step
    }

    fn expects(&self, target: FetchTarget) -> bool {
        match (self.awaiting, target) {
            (Awaiting::Index, FetchTarget::Index) => true,
            (Awaiting::Pack(expected), FetchTarget::Pack { position }) => expected == position,
            _ => false,
        }
    }

    fn on_index(&mut self, response: &FetchResponse, registry: &mut ItemRegistry) -> LoaderStep {
        if response.status == 404 {
            tracing::info!(url = %response.url, "no pack index found");
            return LoaderStep::NotConfigured;
        }

        let index = match check_status(response).and_then(|()| parse::<PackIndex>(response)) {
            Ok(index) => index,
            Err(e) => return LoaderStep::Failed(e),
        };

        let locations: Result<Vec<Url>> = index
            .packs
            .iter()
            .map(|location| locations::resolve(&self.packs_base, location))
            .collect();
        match locations {
            Ok(resolved) => self.locations = resolved,
            Err(e) => return LoaderStep::Failed(e),
        }

        tracing::info!(pack_count = self.locations.len(), generation = registry.generation(), "pack index loaded");
        let next = self.request_pack(0);
        LoaderStep::IndexLoaded { index, next }
    }

    fn on_pack(
        &mut self,
        position: usize,
        response: &FetchResponse,
        registry: &mut ItemRegistry,
        packs: &mut Vec<Pack>,
    ) -> LoaderStep {
        let pack = match check_status(response).and_then(|()| parse::<Pack>(response)) {
            Ok(pack) => pack,
            Err(e) => {
                tracing::warn!(position, error = %e, "pack failed, aborting remaining sequence");
                return LoaderStep::Failed(e);
            }
        };

        if let Err(e) = register_then_publish(registry, packs, pack) {
            return LoaderStep::Failed(e);
        }

        let next = self.request_pack(position + 1);
        LoaderStep::PackPublished {
            position: packs.len() - 1,
            next,
        }
    }

    fn request_pack(&mut self, position: usize) -> Option<FetchRequest> {
        let url = self.locations.get(position)?.to_string();
        self.awaiting = Awaiting::Pack(position);
        Some(self.request(FetchTarget::Pack { position }, url))
    }

    fn request(&self, target: FetchTarget, url: String) -> FetchRequest {
        FetchRequest {
            cycle: self.cycle,
            target,
            url,
            bypass_cache: self.bypass_cache,
        }
    }
}

/// Registers every item of `pack`, then appends the pack to `packs`.
///
/// A pack is never visible before all of its items resolve.
///
/// # Errors
///
/// Returns [`PickerError::RegistryFrozen`] when the registry's cycle has
/// already completed; `packs` is left untouched in that case.
pub fn register_then_publish(registry: &mut ItemRegistry, packs: &mut Vec<Pack>, pack: Pack) -> Result<()> {
    let shadowed = registry.register_pack(&pack)?;
    tracing::debug!(
        pack = %pack.id,
        items = pack.stickers.len(),
        shadowed,
        "pack registered and published"
    );
    packs.push(pack);
    Ok(())
}

fn check_status(response: &FetchResponse) -> Result<()> {
    match response.status {
        0 => Err(PickerError::Transport {
            location: response.url.clone(),
            message: String::from_utf8_lossy(&response.body).into_owned(),
        }),
        status if status >= 400 => Err(PickerError::HttpStatus {
            location: response.url.clone(),
            status,
            status_text: status_text(status),
        }),
        _ => Ok(()),
    }
}

fn parse<T: serde::de::DeserializeOwned>(response: &FetchResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| PickerError::MalformedDocument {
        location: response.url.clone(),
        reason: e.to_string(),
    })
}

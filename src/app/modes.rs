//! Load phase and browse mode state types.
//!
//! The picker is always in exactly one [`LoadPhase`], which decides whether the
//! pack list can be shown at all, and one [`BrowseMode`], which decides what the
//! list area shows once it can.
//!
//! # State Machine
//!
//! ```text
//! Loading ──404 / no packs──> Empty
//!    │ ──failure──> Error(message)
//!    │ ──first pack published──> Ready
//!    └──────────── reload from any phase ───────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::app::modes::{BrowseMode, LoadPhase};
//!
//! let phase = LoadPhase::Loading;
//! assert!(!phase.shows_content());
//! assert_eq!(BrowseMode::default(), BrowseMode::Browsing);
//! ```

/// Progress of the current load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Waiting for the index or the first pack.
    #[default]
    Loading,

    /// At least one pack is published.
    ///
    /// Reached before the cycle completes; later packs keep appearing.
    Ready,

    /// The index is missing or lists no packs.
    Empty,

    /// The cycle stopped on a failure.
    ///
    /// Holds the message shown under "Failed to load packs". Packs published
    /// before the failure are kept but not shown.
    Error(String),
}

impl LoadPhase {
    /// Returns whether the pack list is rendered in this phase.
    #[must_use]
    pub const fn shows_content(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// What the list area is showing.
///
/// `Searching` is entered and left by the search term itself: a non-empty
/// normalized term means searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseMode {
    /// Every pack, preceded by the frequently-used section.
    #[default]
    Browsing,

    /// Only packs with matching items, each reduced to its matches.
    Searching,

    /// The alternate-source tab replaces the pack list.
    ///
    /// Only reachable when the index declared alternate-source credentials.
    ViewingAlternateSource,
}

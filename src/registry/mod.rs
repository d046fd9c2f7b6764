//! Item registry and frequently-used cache.
//!
//! - [`items`]: per-cycle identifier to item lookup with a freeze lifecycle
//! - [`frequent`]: durable use ranking and its displayable snapshot

pub mod frequent;
pub mod items;

pub use frequent::{FrequencyCache, FrequencyRecord, UsageEntry, DISPLAY_LIMIT, MAX_TRACKED};
pub use items::ItemRegistry;

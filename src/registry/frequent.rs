//! Frequently-used ranking and its displayable cache.
//!
//! Every pick bumps the item's use count and last-use timestamp in a
//! [`FrequencyRecord`]. Ranking orders entries by count, then recency:
//!
//! ```text
//! count desc -> last_used desc -> id asc
//! ```
//!
//! The record tracks at most [`MAX_TRACKED`] identifiers. Every tracked
//! identifier that resolves is kept in a denormalized snapshot, so each picked
//! item stays resolvable in sessions where its pack is unavailable; the
//! pseudo-pack shows the top [`DISPLAY_LIMIT`] of them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::items::ItemRegistry;
use crate::domain::{Item, Pack};

/// Maximum number of identifiers kept in the record.
pub const MAX_TRACKED: usize = 64;

/// Number of items shown in the frequently-used pseudo-pack.
pub const DISPLAY_LIMIT: usize = 16;

/// Usage statistics for a single identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Number of picks.
    pub count: u32,

    /// Unix timestamp of the latest pick, in milliseconds.
    pub last_used: i64,
}

/// Durable identifier to usage map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyRecord {
    entries: BTreeMap<String, UsageEntry>,
}

impl FrequencyRecord {
    /// Builds a record from already-known entries, trimming it to the bound.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, UsageEntry)>) -> Self {
        let mut record = Self {
            entries: entries.into_iter().collect(),
        };
        record.evict(None);
        record
    }

    /// Records one pick of `id` at `now_ms`.
    ///
    /// When the bound is exceeded the lowest-ranked entry other than `id` is
    /// evicted.
    pub fn record(&mut self, id: &str, now_ms: i64) {
        let entry = self.entries.entry(id.to_string()).or_insert(UsageEntry {
            count: 0,
            last_used: now_ms,
        });
        entry.count = entry.count.saturating_add(1);
        entry.last_used = entry.last_used.max(now_ms);

        self.evict(Some(id));
    }

    /// Returns all tracked identifiers, best first.
    #[must_use]
    pub fn ranked_ids(&self) -> Vec<&str> {
        let mut ranked: Vec<(&String, &UsageEntry)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| rank(a, b));
        ranked.into_iter().map(|(id, _)| id.as_str()).collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&UsageEntry> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&mut self, keep: Option<&str>) {
        while self.entries.len() > MAX_TRACKED {
            let victim = self
                .ranked_ids()
                .into_iter()
                .rev()
                .find(|id| Some(*id) != keep)
                .map(str::to_string);
            match victim {
                Some(id) => {
                    self.entries.remove(&id);
                }
                None => break,
            }
        }
    }
}

fn rank(a: &(&String, &UsageEntry), b: &(&String, &UsageEntry)) -> Ordering {
    b.1.count
        .cmp(&a.1.count)
        .then_with(|| b.1.last_used.cmp(&a.1.last_used))
        .then_with(|| a.0.cmp(b.0))
}

/// The frequency record plus the items currently displayable from it.
///
/// # Examples
///
/// ```
/// use stickerpicker::{FrequencyCache, Item, ItemRegistry};
///
/// let mut registry = ItemRegistry::seeded(1, Vec::new());
/// registry.register(Item::new("cat", "mxc://x/cat", "cat")).unwrap();
///
/// let mut cache = FrequencyCache::default();
/// cache.record_use("cat", 1_000, &registry);
/// assert_eq!(cache.displayed()[0].id, "cat");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrequencyCache {
    record: FrequencyRecord,
    items: Vec<Item>,
}

impl FrequencyCache {
    /// Restores the cache from persisted state.
    ///
    /// The snapshot is trusted as-is until the next [`refresh`](Self::refresh).
    pub fn new(record: FrequencyRecord, snapshot: Vec<Item>) -> Self {
        Self {
            record,
            items: snapshot,
        }
    }

    /// Records a pick and recomputes the displayable items.
    pub fn record_use(&mut self, id: &str, now_ms: i64, registry: &ItemRegistry) {
        let _span = tracing::debug_span!("frequency_record_use", id = %id).entered();
        self.record.record(id, now_ms);
        self.refresh(registry);
    }

    /// Re-materializes every tracked identifier against `registry`.
    ///
    /// Identifiers that no longer resolve are left out of the snapshot but
    /// stay in the record.
    pub fn refresh(&mut self, registry: &ItemRegistry) {
        self.items = self
            .record
            .ranked_ids()
            .into_iter()
            .filter_map(|id| registry.resolve(id).cloned())
            .collect();
        tracing::debug!(displayed = self.items.len(), tracked = self.record.len(), "frequency cache refreshed");
    }

    /// Every resolvable tracked item, best first. This is what gets persisted
    /// and seeded into the next cycle's registry.
    #[must_use]
    pub fn snapshot(&self) -> &[Item] {
        &self.items
    }

    /// Items shown in the pseudo-pack: the top of the snapshot.
    #[must_use]
    pub fn displayed(&self) -> &[Item] {
        &self.items[..self.items.len().min(DISPLAY_LIMIT)]
    }

    #[must_use]
    pub const fn record(&self) -> &FrequencyRecord {
        &self.record
    }

    /// Builds the frequently-used pseudo-pack from the displayed items.
    #[must_use]
    pub fn as_pack(&self) -> Pack {
        Pack::frequently_used(self.displayed().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[&str]) -> ItemRegistry {
        let mut registry = ItemRegistry::default();
        for id in ids {
            registry.register(Item::new(*id, format!("mxc://x/{id}"), *id)).unwrap();
        }
        registry
    }

    #[test]
    fn count_outranks_recency() {
        let mut record = FrequencyRecord::default();
        record.record("a", 1);
        record.record("a", 2);
        record.record("b", 10);
        assert_eq!(record.ranked_ids(), vec!["a", "b"]);
    }

    #[test]
    fn recency_breaks_count_ties() {
        let mut record = FrequencyRecord::default();
        record.record("a", 1);
        record.record("b", 5);
        assert_eq!(record.ranked_ids(), vec!["b", "a"]);
    }

    #[test]
    fn identical_usage_orders_by_id() {
        let record = FrequencyRecord::from_entries([
            ("z".to_string(), UsageEntry { count: 1, last_used: 7 }),
            ("m".to_string(), UsageEntry { count: 1, last_used: 7 }),
        ]);
        assert_eq!(record.ranked_ids(), vec!["m", "z"]);
    }

    #[test]
    fn eviction_spares_the_latest_pick() {
        let mut record = FrequencyRecord::default();
        for i in 0..MAX_TRACKED {
            let id = format!("id{i:02}");
            record.record(&id, 100);
            record.record(&id, 100);
        }
        record.record("newcomer", 200);

        assert_eq!(record.len(), MAX_TRACKED);
        assert!(record.get("newcomer").is_some());
        assert!(record.get("id63").is_none());
    }

    #[test]
    fn display_is_capped_and_drops_unresolvable() {
        let ids: Vec<String> = (0..20).map(|i| format!("s{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let registry = registry_with(&refs[1..]);

        let mut cache = FrequencyCache::default();
        for (i, id) in ids.iter().enumerate() {
            cache.record_use(id, i64::try_from(i).unwrap(), &registry);
        }

        // s19 is the most recent; s0 is unresolvable
        assert_eq!(cache.displayed().len(), DISPLAY_LIMIT);
        assert_eq!(cache.displayed()[0].id, "s19");
        assert_eq!(cache.snapshot().len(), 19);
        assert_eq!(cache.as_pack().stickers.len(), DISPLAY_LIMIT);
        assert_eq!(cache.record().len(), 20);
    }

    #[test]
    fn snapshot_keeps_items_below_the_display_cut() {
        let ids: Vec<String> = (0..DISPLAY_LIMIT + 4).map(|i| format!("s{i:02}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let registry = registry_with(&refs);

        let mut cache = FrequencyCache::default();
        for (i, id) in ids.iter().enumerate() {
            cache.record_use(id, i64::try_from(i).unwrap(), &registry);
        }

        // s00 ranks last and is not displayed, but a registry seeded from the
        // snapshot still resolves it.
        assert!(cache.displayed().iter().all(|item| item.id != "s00"));
        let reseeded = ItemRegistry::seeded(2, cache.snapshot().iter().cloned());
        for id in &ids {
            assert!(reseeded.resolve(id).is_some(), "{id} lost");
        }
    }

    #[test]
    fn unresolvable_ids_stay_in_record() {
        let mut cache = FrequencyCache::default();
        cache.record_use("ghost", 1, &ItemRegistry::default());
        assert!(cache.snapshot().is_empty());
        assert_eq!(cache.record().len(), 1);
    }

    #[test]
    fn pseudo_pack_mirrors_snapshot() {
        let registry = registry_with(&["a"]);
        let mut cache = FrequencyCache::default();
        cache.record_use("a", 1, &registry);
        let pack = cache.as_pack();
        assert!(pack.is_frequently_used());
        assert_eq!(pack.stickers.len(), 1);
    }
}

//! Deduplicating identifier to item lookup.
//!
//! One [`ItemRegistry`] lives for exactly one load cycle. It is seeded from the
//! frequency cache snapshot when the cycle starts, grows while packs arrive,
//! and is frozen once the last pack has been published. A reload replaces it
//! wholesale.

use std::collections::HashMap;

use crate::domain::{Item, Pack, PickerError, Result};

/// Identifier to item map aggregated across loaded packs and the frequency
/// cache snapshot.
///
/// Identifiers are globally unique: registering an identifier that already
/// exists overwrites it, so the last-loaded pack shadows earlier ones.
///
/// # Examples
///
/// ```
/// use stickerpicker::{Item, ItemRegistry};
///
/// let mut registry = ItemRegistry::seeded(1, Vec::new());
/// registry.register(Item::new("x", "mxc://a/1", "first")).unwrap();
/// registry.register(Item::new("x", "mxc://b/1", "second")).unwrap();
/// assert_eq!(registry.resolve("x").unwrap().body, "second");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<String, Item>,
    generation: u64,
    frozen: bool,
}

impl ItemRegistry {
    /// Creates the registry for load cycle `generation`, pre-populated with
    /// previously displayed items so they stay resolvable even when their pack
    /// has disappeared from the index.
    pub fn seeded(generation: u64, snapshot: impl IntoIterator<Item = Item>) -> Self {
        let items = snapshot
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items,
            generation,
            frozen: false,
        }
    }

    /// Registers an item, returning the entry it shadowed if any.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::RegistryFrozen`] once the cycle has completed.
    pub fn register(&mut self, item: Item) -> Result<Option<Item>> {
        if self.frozen {
            return Err(PickerError::RegistryFrozen { id: item.id });
        }
        Ok(self.items.insert(item.id.clone(), item))
    }

    /// Registers every item of `pack` in document order.
    ///
    /// Returns the number of identifiers that shadowed an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::RegistryFrozen`] once the cycle has completed.
    /// Nothing is registered in that case.
    pub fn register_pack(&mut self, pack: &Pack) -> Result<usize> {
        if self.frozen {
            let id = pack.stickers.first().map(|s| s.id.clone()).unwrap_or_default();
            return Err(PickerError::RegistryFrozen { id });
        }

        let mut shadowed = 0;
        for item in &pack.stickers {
            if self.register(item.clone())?.is_some() {
                shadowed += 1;
            }
        }
        Ok(shadowed)
    }

    /// Looks up an item by identifier.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Marks the registry read-only for the rest of its lifetime.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Load cycle this registry belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

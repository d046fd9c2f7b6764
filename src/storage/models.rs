//! Store keys and the persisted state snapshot.
//!
//! Schema version 2 holds four keys:
//!
//! | key | value |
//! |---|---|
//! | `stickers_per_row` | integer |
//! | `theme_override` | `"light"`, `"dark"` or `"black"` |
//! | `frequently_used` | id → `{ "count", "last_used" }` |
//! | `frequently_used_cache` | list of items |

use serde::{Deserialize, Serialize};

use super::backend::{Storage, StorageExt, StoreKey};
use crate::domain::settings::clamp_stickers_per_row;
use crate::domain::{Item, ThemeName};
use crate::registry::FrequencyRecord;

/// Typed keys of the current schema.
pub mod keys {
    use super::{FrequencyRecord, Item, StoreKey, ThemeName};

    /// Items per grid row.
    pub struct StickersPerRow;

    impl StoreKey for StickersPerRow {
        const NAME: &'static str = "stickers_per_row";
        type Value = usize;
    }

    /// Explicit theme choice; absent means the launch default applies.
    pub struct ThemeOverride;

    impl StoreKey for ThemeOverride {
        const NAME: &'static str = "theme_override";
        type Value = ThemeName;
    }

    /// Use statistics per item identifier.
    pub struct FrequentlyUsed;

    impl StoreKey for FrequentlyUsed {
        const NAME: &'static str = "frequently_used";
        type Value = FrequencyRecord;
    }

    /// Denormalized snapshot of the displayed frequently-used items.
    pub struct FrequentlyUsedCache;

    impl StoreKey for FrequentlyUsedCache {
        const NAME: &'static str = "frequently_used_cache";
        type Value = Vec<Item>;
    }
}

/// Everything the plugin restores at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub stickers_per_row: Option<usize>,
    pub theme_override: Option<ThemeName>,
    #[serde(default)]
    pub frequently_used: FrequencyRecord,
    #[serde(default)]
    pub frequently_used_cache: Vec<Item>,
}

impl PersistedState {
    /// Reads every key from `storage`.
    ///
    /// A value that no longer matches its schema is logged and treated as
    /// absent, so one corrupt key never hides the others.
    pub fn read<S: Storage + ?Sized>(storage: &S) -> Self {
        Self {
            stickers_per_row: lenient(storage.load::<keys::StickersPerRow>()).map(clamp_stickers_per_row),
            theme_override: lenient(storage.load::<keys::ThemeOverride>()),
            frequently_used: lenient(storage.load::<keys::FrequentlyUsed>()).unwrap_or_default(),
            frequently_used_cache: lenient(storage.load::<keys::FrequentlyUsedCache>()).unwrap_or_default(),
        }
    }
}

fn lenient<T>(result: crate::domain::Result<Option<T>>) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable stored value");
        None
    })
}

//! Schema migrations for the JSON store.
//!
//! Version 1 files are a flat dump of the widget's legacy keys, with every
//! value stored as a string the way a browser key-value store keeps them:
//!
//! ```json
//! {
//!   "mauStickersPerRow": "5",
//!   "mauStickerThemeOverride": "dark",
//!   "mauFrequentlyUsedStickerIDs": "{\"cat\":[3,1700000000000]}",
//!   "mauFrequentlyUsedStickerCache": "[[\"cat\",{\"id\":\"cat\",\"url\":\"mxc://x/cat\",\"body\":\"cat\"}]]"
//! }
//! ```
//!
//! Values that cannot be understood are dropped with a warning rather than
//! failing the whole migration.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::backend::StoreKey;
use super::models::keys;
use crate::domain::{Item, ThemeName};
use crate::registry::{FrequencyRecord, UsageEntry};

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 2;

const LEGACY_PER_ROW: &str = "mauStickersPerRow";
const LEGACY_THEME: &str = "mauStickerThemeOverride";
const LEGACY_FREQUENT_IDS: &str = "mauFrequentlyUsedStickerIDs";
const LEGACY_FREQUENT_CACHE: &str = "mauFrequentlyUsedStickerCache";

/// Converts a version 1 document into version 2 values.
#[must_use]
pub fn migrate_v1(legacy: &Map<String, Value>) -> BTreeMap<String, Value> {
    let _span = tracing::debug_span!("migrate_v1", keys = legacy.len()).entered();
    let mut values = BTreeMap::new();

    if let Some(per_row) = legacy.get(LEGACY_PER_ROW).and_then(legacy_integer) {
        values.insert(keys::StickersPerRow::NAME.to_string(), Value::from(per_row));
    }

    if let Some(theme) = legacy.get(LEGACY_THEME).and_then(Value::as_str) {
        match theme.parse::<ThemeName>() {
            Ok(theme) => {
                values.insert(keys::ThemeOverride::NAME.to_string(), Value::from(theme.as_str()));
            }
            Err(e) => tracing::warn!(error = %e, "dropping legacy theme override"),
        }
    }

    if let Some(raw) = legacy.get(LEGACY_FREQUENT_IDS).and_then(decode_embedded) {
        let record = legacy_frequency_record(&raw);
        if let Ok(value) = serde_json::to_value(&record) {
            values.insert(keys::FrequentlyUsed::NAME.to_string(), value);
        }
    }

    if let Some(raw) = legacy.get(LEGACY_FREQUENT_CACHE).and_then(decode_embedded) {
        let items = legacy_item_cache(&raw);
        if let Ok(value) = serde_json::to_value(&items) {
            values.insert(keys::FrequentlyUsedCache::NAME.to_string(), value);
        }
    }

    tracing::info!(migrated = values.len(), "migrated legacy store");
    values
}

/// Legacy values were JSON text inside a string. Plain JSON is accepted too.
fn decode_embedded(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) => serde_json::from_str(text)
            .map_err(|e| tracing::warn!(error = %e, "dropping undecodable legacy value"))
            .ok(),
        other => Some(other.clone()),
    }
}

fn legacy_integer(value: &Value) -> Option<u64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        other => other.as_u64(),
    }
}

/// `{ id: [count, timestamp_ms] }`
fn legacy_frequency_record(raw: &Value) -> FrequencyRecord {
    let Some(entries) = raw.as_object() else {
        return FrequencyRecord::default();
    };

    FrequencyRecord::from_entries(entries.iter().filter_map(|(id, pair)| {
        let pair = pair.as_array()?;
        let count = u32::try_from(pair.first()?.as_u64()?).ok()?;
        let last_used = pair.get(1).and_then(Value::as_i64).unwrap_or(0);
        Some((id.clone(), UsageEntry { count, last_used }))
    }))
}

/// `[[id, item], ...]`
fn legacy_item_cache(raw: &Value) -> Vec<Item> {
    raw.as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| pair.as_array()?.get(1).cloned())
                .filter_map(|item| serde_json::from_value::<Item>(item).ok())
                .collect()
        })
        .unwrap_or_default()
}

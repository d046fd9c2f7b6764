//! Live search across loaded packs.
//!
//! Filtering is a pure recomputation from the search term and the pack list.
//! Nothing here keeps state or mutates its input; the app only stores the
//! term as typed and calls [`filter`] whenever it needs the filtered view.
//!
//! Matching is a case-folded, trimmed substring test against an item's label
//! or identifier:
//!
//! ```text
//! term "  Cat "  ->  "cat"
//! item { id: "tabby-1", body: "Happy CAT" }  ->  matches via body
//! ```

use std::ops::Range;

use crate::domain::{Item, Pack};

/// Normalizes a search term or an item field for comparison.
///
/// # Examples
///
/// ```
/// use stickerpicker::search::normalize;
///
/// assert_eq!(normalize("  Happy CAT \n"), "happy cat");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Returns whether `item` matches an already-normalized term.
#[must_use]
pub fn matches(normalized_term: &str, item: &Item) -> bool {
    normalize(&item.body).contains(normalized_term) || normalize(&item.id).contains(normalized_term)
}

/// Filters packs down to the items matching `term`.
///
/// Pack order is preserved, so callers pass the frequently-used pseudo-pack
/// first when it should lead the results. Packs left without items are dropped.
///
/// # Examples
///
/// ```
/// use stickerpicker::{search, Item, Pack};
///
/// let packs = vec![
///     Pack::new("cats", "Cats", vec![Item::new("c1", "mxc://x/1", "Grumpy cat")]),
///     Pack::new("dogs", "Dogs", vec![Item::new("d1", "mxc://x/2", "Good dog")]),
/// ];
/// let result = search::filter(" CAT", &packs);
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].id, "cats");
/// assert_eq!(packs[1].stickers.len(), 1);
/// ```
#[must_use]
pub fn filter<'a>(term: &str, packs: impl IntoIterator<Item = &'a Pack>) -> Vec<Pack> {
    let needle = normalize(term);
    let _span = tracing::debug_span!("search_filter", term = %needle).entered();

    packs
        .into_iter()
        .filter_map(|pack| {
            let stickers: Vec<Item> = pack
                .stickers
                .iter()
                .filter(|item| matches(&needle, item))
                .cloned()
                .collect();
            (!stickers.is_empty()).then(|| Pack::new(pack.id.clone(), pack.title.clone(), stickers))
        })
        .collect()
}

/// Returns the character range of `label` to highlight for `term`.
///
/// Positions count characters of the untrimmed label. `None` when the label
/// itself does not contain the term, e.g. when an item matched by identifier.
#[must_use]
pub fn highlight_range(term: &str, label: &str) -> Option<Range<usize>> {
    let needle = normalize(term);
    if needle.is_empty() {
        return None;
    }

    let leading = label.chars().take_while(|c| c.is_whitespace()).count();
    let haystack = normalize(label);
    let byte_start = haystack.find(&needle)?;
    let start = leading + haystack[..byte_start].chars().count();
    Some(start..start + needle.chars().count())
}

//! Visibility-driven image activation.
//!
//! Every rendered item cell owns an [`ImageSlot`] holding the deferred
//! thumbnail source. When the cell enters the pre-load area the deferred source
//! is promoted to the active source and the slot is flagged as loaded; when it
//! leaves, the active source is cleared again. Re-entering activates the slot
//! once more, so thumbnails are re-fetched rather than cached.

use std::collections::HashMap;

use super::subscription::{ElementId, Visibility, VisibilityEvent};

/// Image state of one item cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    /// Source waiting to be activated.
    pub deferred_src: String,
    /// Source currently loading or displayed, if any.
    pub active_src: Option<String>,
    /// Visual "loaded" flag.
    pub loaded: bool,
    /// How many times the slot was activated.
    pub activations: u32,
}

impl ImageSlot {
    fn new(deferred_src: String) -> Self {
        Self {
            deferred_src,
            active_src: None,
            loaded: false,
            activations: 0,
        }
    }
}

/// Applies visibility batches to image slots.
///
/// # Examples
///
/// ```
/// use stickerpicker::viewport::{ElementId, LazyImageLoader, VisibilityEvent};
///
/// let cell = ElementId::cell("cats", "c1");
/// let mut loader = LazyImageLoader::default();
/// loader.attach(cell.clone(), "https://example.org/thumbs/c1.png");
///
/// loader.apply(&[VisibilityEvent::entered(cell.clone())]);
/// assert!(loader.slot(&cell).unwrap().loaded);
///
/// loader.apply(&[VisibilityEvent::left(cell.clone())]);
/// assert!(loader.slot(&cell).unwrap().active_src.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LazyImageLoader {
    slots: HashMap<ElementId, ImageSlot>,
}

impl LazyImageLoader {
    /// Registers a cell with its deferred source.
    ///
    /// Attaching an already known cell keeps its state unless the source
    /// changed, in which case the slot starts over.
    pub fn attach(&mut self, element: ElementId, deferred_src: impl Into<String>) {
        let deferred_src = deferred_src.into();
        match self.slots.get_mut(&element) {
            Some(slot) if slot.deferred_src == deferred_src => {}
            Some(slot) => *slot = ImageSlot::new(deferred_src),
            None => {
                self.slots.insert(element, ImageSlot::new(deferred_src));
            }
        }
    }

    /// Applies one visibility batch. Events for unknown cells are ignored.
    pub fn apply(&mut self, batch: &[VisibilityEvent]) {
        for event in batch {
            let Some(slot) = self.slots.get_mut(&event.element) else {
                continue;
            };
            match event.change {
                Visibility::Entered => {
                    slot.active_src = Some(slot.deferred_src.clone());
                    slot.loaded = true;
                    slot.activations += 1;
                }
                Visibility::Left => {
                    slot.active_src = None;
                    slot.loaded = false;
                }
            }
        }
    }

    /// Drops the slot of a cell that is no longer rendered.
    pub fn forget(&mut self, element: &ElementId) {
        self.slots.remove(element);
    }

    /// Drops every slot.
    pub fn disconnect(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn slot(&self, element: &ElementId) -> Option<&ImageSlot> {
        self.slots.get(element)
    }

    /// Returns whether the cell's image is currently active.
    #[must_use]
    pub fn is_loaded(&self, element: &ElementId) -> bool {
        self.slots.get(element).is_some_and(|slot| slot.loaded)
    }

    /// Number of cells with an active source.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.active_src.is_some()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_reactivates() {
        let cell = ElementId::cell("p", "a");
        let mut loader = LazyImageLoader::default();
        loader.attach(cell.clone(), "src-a");

        loader.apply(&[VisibilityEvent::entered(cell.clone())]);
        loader.apply(&[VisibilityEvent::left(cell.clone())]);
        loader.apply(&[VisibilityEvent::entered(cell.clone())]);

        let slot = loader.slot(&cell).unwrap();
        assert_eq!(slot.activations, 2);
        assert_eq!(slot.active_src.as_deref(), Some("src-a"));
        assert!(slot.loaded);
    }

    #[test]
    fn reattach_with_same_source_keeps_state() {
        let cell = ElementId::cell("p", "a");
        let mut loader = LazyImageLoader::default();
        loader.attach(cell.clone(), "src");
        loader.apply(&[VisibilityEvent::entered(cell.clone())]);
        loader.attach(cell.clone(), "src");
        assert!(loader.is_loaded(&cell));

        loader.attach(cell.clone(), "other");
        assert!(!loader.is_loaded(&cell));
    }

    #[test]
    fn unknown_cells_are_ignored() {
        let mut loader = LazyImageLoader::default();
        loader.apply(&[VisibilityEvent::entered(ElementId::cell("p", "ghost"))]);
        assert!(loader.is_empty());
    }

    #[test]
    fn disconnect_drops_all_slots() {
        let mut loader = LazyImageLoader::default();
        loader.attach(ElementId::cell("p", "a"), "a");
        loader.attach(ElementId::cell("p", "b"), "b");
        loader.apply(&[VisibilityEvent::entered(ElementId::cell("p", "a"))]);
        assert_eq!(loader.active_count(), 1);

        loader.disconnect();
        assert!(loader.is_empty());
        assert_eq!(loader.active_count(), 0);
    }
}

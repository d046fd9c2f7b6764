//! Generic viewport visibility subscriptions.
//!
//! Observers subscribe elements by identity and geometry, then poll with the
//! current viewport. Each poll yields a batch of [`VisibilityEvent`]s describing
//! which elements started or stopped intersecting the viewport (expanded by the
//! subscription's margin). The first poll after an element is subscribed always
//! reports its current state, whether intersecting or not; later polls only
//! report transitions.

use std::collections::BTreeMap;

/// Axis-aligned rectangle in content coordinates (columns, rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns whether the two rectangles share at least one cell.
    ///
    /// Empty rectangles never intersect anything.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.width > 0
            && self.height > 0
            && other.width > 0
            && other.height > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grows the rectangle by `margin` on every side.
    #[must_use]
    pub const fn expand(&self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    /// Returns whether the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Identity of an observed element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    /// A pack section container, by pack id.
    Section(String),
    /// An item cell, keyed by (section, item id).
    ///
    /// The section keeps the frequently-used copy of an item apart from the
    /// one in its own pack. Within one section an item id repeated by the pack
    /// maps to a single cell, so every repeat shares one image slot and one
    /// visibility state.
    Cell {
        /// Owning section's pack id.
        section: String,
        /// Item id.
        item: String,
    },
}

impl ElementId {
    /// Cell identity for `item` in `section`. Repeats of an id inside the same
    /// section yield equal ids.
    pub fn cell(section: impl Into<String>, item: impl Into<String>) -> Self {
        Self::Cell {
            section: section.into(),
            item: item.into(),
        }
    }
}

/// Direction of a visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Entered,
    Left,
}

/// A single visibility change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub element: ElementId,
    pub change: Visibility,
}

impl VisibilityEvent {
    #[must_use]
    pub const fn entered(element: ElementId) -> Self {
        Self {
            element,
            change: Visibility::Entered,
        }
    }

    #[must_use]
    pub const fn left(element: ElementId) -> Self {
        Self {
            element,
            change: Visibility::Left,
        }
    }

    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.change == Visibility::Entered
    }
}

/// Capability to observe element visibility against a viewport.
///
/// Implementations may poll geometry, wrap a native observer, or be a test
/// double that hands out scripted batches.
pub trait ViewportSubscription {
    /// Starts observing `element`, or updates its geometry if already observed.
    fn subscribe(&mut self, element: ElementId, bounds: Rect);

    /// Stops observing `element`. No event is emitted for it.
    fn unsubscribe(&mut self, element: &ElementId);

    /// Stops observing every element.
    fn disconnect(&mut self);

    /// Elements currently observed.
    fn observed(&self) -> Vec<ElementId>;

    /// Evaluates every observed element against `viewport` and returns the
    /// resulting batch, possibly empty.
    fn poll(&mut self, viewport: Rect) -> Vec<VisibilityEvent>;
}

#[derive(Debug, Clone)]
struct Tracked {
    bounds: Rect,
    intersecting: Option<bool>,
}

/// Polling [`ViewportSubscription`] computing intersections from geometry.
///
/// # Examples
///
/// ```
/// use stickerpicker::viewport::{ElementId, GeometryViewport, Rect, ViewportSubscription};
///
/// let mut viewport = GeometryViewport::new(2);
/// viewport.subscribe(ElementId::Section("cats".into()), Rect::new(0, 11, 40, 5));
///
/// // Ten visible rows plus a two-row margin reach row 11.
/// let batch = viewport.poll(Rect::new(0, 0, 40, 10));
/// assert!(batch[0].is_entered());
/// assert!(viewport.poll(Rect::new(0, 0, 40, 10)).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeometryViewport {
    margin: i32,
    elements: BTreeMap<ElementId, Tracked>,
}

impl GeometryViewport {
    /// Creates a subscription that treats elements within `margin` cells of the
    /// viewport as intersecting.
    #[must_use]
    pub const fn new(margin: i32) -> Self {
        Self {
            margin,
            elements: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn margin(&self) -> i32 {
        self.margin
    }

    /// Returns whether `element` intersected at the last poll.
    #[must_use]
    pub fn is_intersecting(&self, element: &ElementId) -> bool {
        self.elements
            .get(element)
            .and_then(|tracked| tracked.intersecting)
            .unwrap_or(false)
    }
}

impl ViewportSubscription for GeometryViewport {
    fn subscribe(&mut self, element: ElementId, bounds: Rect) {
        self.elements
            .entry(element)
            .and_modify(|tracked| tracked.bounds = bounds)
            .or_insert(Tracked {
                bounds,
                intersecting: None,
            });
    }

    fn unsubscribe(&mut self, element: &ElementId) {
        self.elements.remove(element);
    }

    fn disconnect(&mut self) {
        tracing::debug!(observed = self.elements.len(), "disconnecting viewport subscription");
        self.elements.clear();
    }

    fn observed(&self) -> Vec<ElementId> {
        self.elements.keys().cloned().collect()
    }

    fn poll(&mut self, viewport: Rect) -> Vec<VisibilityEvent> {
        let root = viewport.expand(self.margin);
        let mut batch = Vec::new();

        for (element, tracked) in &mut self.elements {
            let now = tracked.bounds.intersects(&root);
            if tracked.intersecting != Some(now) {
                tracked.intersecting = Some(now);
                batch.push(VisibilityEvent {
                    element: element.clone(),
                    change: if now { Visibility::Entered } else { Visibility::Left },
                });
            }
        }
        batch
    }
}

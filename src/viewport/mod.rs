//! Viewport geometry and visibility observers.
//!
//! - [`subscription`]: the generic visibility subscription and its polling implementation
//! - [`layout`]: element geometry for the pack list and navigation strip
//! - [`lazy`]: image activation driven by cell visibility
//! - [`nav`]: navigation strip synchronization driven by section visibility

pub mod layout;
pub mod lazy;
pub mod nav;
pub mod subscription;

pub use layout::{
    CellGeometry, IndicatorGeometry, NavLayout, PageLayout, SectionGeometry, ALT_SOURCE_INDICATOR_ID, CELL_HEIGHT,
    SETTINGS_SECTION_ID, TITLE_HEIGHT,
};
pub use lazy::{ImageSlot, LazyImageLoader};
pub use nav::{select_scroll_correction, NavSynchronizer, ScrollCorrection};
pub use subscription::{ElementId, GeometryViewport, Rect, Visibility, VisibilityEvent, ViewportSubscription};

/// Pre-load margin of the image observer, in rows.
pub const IMAGE_MARGIN: i32 = 2;

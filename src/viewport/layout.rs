//! Element geometry for the pack list and the navigation strip.
//!
//! The pack list is laid out top to bottom in content rows:
//!
//! ```text
//! row 0    Frequently used            <- section title
//! row 1    [cell] [cell] [cell] [cell] <- CELL_HEIGHT rows per grid row
//! row 3    [cell]
//! row 5                               <- spacer
//! row 6    Cats
//! ...
//! row N    Settings                   <- fixed-height settings section
//! ```
//!
//! The navigation strip is a single row of indicators laid out left to right.

use super::subscription::Rect;
use crate::domain::Pack;

/// Rows taken by one grid row of cells.
pub const CELL_HEIGHT: i32 = 2;

/// Rows taken by a section title.
pub const TITLE_HEIGHT: i32 = 1;

/// Blank rows after each section.
pub const SECTION_SPACING: i32 = 1;

/// Rows taken by the settings section.
pub const SETTINGS_HEIGHT: i32 = 4;

/// Maximum label characters shown in a navigation indicator.
pub const INDICATOR_LABEL_CHARS: usize = 10;

/// Section id of the trailing settings section.
pub const SETTINGS_SECTION_ID: &str = "settings";

/// Indicator id of the alternate-source tab.
pub const ALT_SOURCE_INDICATOR_ID: &str = "alt-source";

/// Geometry of one item cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGeometry {
    pub item_id: String,
    pub bounds: Rect,
}

/// Geometry of one pack section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGeometry {
    pub pack_id: String,
    pub title: String,
    pub bounds: Rect,
    pub cells: Vec<CellGeometry>,
}

/// Geometry of the whole pack list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub sections: Vec<SectionGeometry>,
    pub settings: Rect,
    pub content_height: i32,
    pub cell_width: i32,
}

impl PageLayout {
    /// Lays out `packs` in a `width`-column list with `per_row` cells per row.
    ///
    /// # Examples
    ///
    /// ```
    /// use stickerpicker::viewport::PageLayout;
    /// use stickerpicker::{Item, Pack};
    ///
    /// let pack = Pack::new("p", "P", (0..5).map(|i| Item::new(i.to_string(), "mxc://x", "s")).collect());
    /// let layout = PageLayout::compute(&[pack], 4, 40);
    /// // title + two grid rows + spacer
    /// assert_eq!(layout.sections[0].bounds.height, 1 + 2 * 2 + 1);
    /// ```
    #[must_use]
    pub fn compute(packs: &[Pack], per_row: usize, width: usize) -> Self {
        Self::compute_below(0, packs, per_row, width)
    }

    /// Same as [`compute`](Self::compute), leaving `top` rows free above the
    /// first section.
    #[must_use]
    pub fn compute_below(top: i32, packs: &[Pack], per_row: usize, width: usize) -> Self {
        let per_row = per_row.max(1);
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let columns = i32::try_from(per_row).unwrap_or(1);
        let cell_width = (width / columns).max(1);

        let mut y = top.max(0);
        let mut sections = Vec::with_capacity(packs.len());
        for pack in packs {
            let top = y;
            let cells = pack
                .stickers
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let row = i32::try_from(i / per_row).unwrap_or(i32::MAX);
                    let col = i32::try_from(i % per_row).unwrap_or(0);
                    CellGeometry {
                        item_id: item.id.clone(),
                        bounds: Rect::new(col * cell_width, top + TITLE_HEIGHT + row * CELL_HEIGHT, cell_width, CELL_HEIGHT),
                    }
                })
                .collect();

            let grid_rows = i32::try_from(pack.stickers.len().div_ceil(per_row)).unwrap_or(i32::MAX);
            let height = TITLE_HEIGHT + grid_rows * CELL_HEIGHT + SECTION_SPACING;
            sections.push(SectionGeometry {
                pack_id: pack.id.clone(),
                title: pack.title.clone(),
                bounds: Rect::new(0, top, width, height),
                cells,
            });
            y += height;
        }

        let settings = Rect::new(0, y, width, SETTINGS_HEIGHT);
        Self {
            sections,
            settings,
            content_height: y + SETTINGS_HEIGHT,
            cell_width,
        }
    }

    /// Largest valid scroll offset for a viewport `visible_rows` tall.
    #[must_use]
    pub fn max_scroll(&self, visible_rows: usize) -> i32 {
        let visible = i32::try_from(visible_rows).unwrap_or(i32::MAX);
        (self.content_height - visible).max(0)
    }

    /// Top row of the section for `pack_id`, settings included.
    #[must_use]
    pub fn section_top(&self, pack_id: &str) -> Option<i32> {
        if pack_id == SETTINGS_SECTION_ID {
            return Some(self.settings.y);
        }
        self.sections
            .iter()
            .find(|s| s.pack_id == pack_id)
            .map(|s| s.bounds.y)
    }

    /// Finds the cell at content position (`x`, `y`).
    ///
    /// Returns the section index and the cell index within that section.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let section = self.sections.iter().position(|s| s.bounds.contains(x, y))?;
        let cell = self.sections[section].cells.iter().position(|c| c.bounds.contains(x, y))?;
        Some((section, cell))
    }

    /// Index of the first section whose bounds reach `row` or below.
    #[must_use]
    pub fn section_index_at(&self, row: i32) -> Option<usize> {
        self.sections.iter().position(|s| s.bounds.bottom() > row)
    }
}

/// Geometry of one navigation indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorGeometry {
    pub id: String,
    pub label: String,
    pub bounds: Rect,
}

/// Geometry of the navigation strip, in strip content columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavLayout {
    pub indicators: Vec<IndicatorGeometry>,
    pub content_width: i32,
}

impl NavLayout {
    /// Lays out `(id, label)` entries left to right.
    ///
    /// Each indicator is its truncated label padded by one column on each side.
    pub fn compute<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut x = 0;
        let indicators: Vec<IndicatorGeometry> = entries
            .into_iter()
            .map(|(id, label)| {
                let label: String = label.chars().take(INDICATOR_LABEL_CHARS).collect();
                let width = i32::try_from(label.chars().count()).unwrap_or(0) + 2;
                let geometry = IndicatorGeometry {
                    id: id.to_string(),
                    label,
                    bounds: Rect::new(x, 0, width, 1),
                };
                x += width;
                geometry
            })
            .collect();
        Self {
            indicators,
            content_width: x,
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndicatorGeometry> {
        self.indicators.iter().find(|i| i.id == id)
    }

    /// Finds the indicator covering strip content column `x`.
    #[must_use]
    pub fn indicator_at(&self, x: i32) -> Option<&IndicatorGeometry> {
        self.indicators.iter().find(|i| i.bounds.contains(x, 0))
    }

    /// Largest valid strip scroll offset for a strip `width` columns wide.
    #[must_use]
    pub fn max_scroll(&self, width: usize) -> i32 {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        (self.content_width - width).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    fn pack(id: &str, n: usize) -> Pack {
        Pack::new(
            id,
            id,
            (0..n).map(|i| Item::new(format!("{id}-{i}"), "mxc://x", "s")).collect(),
        )
    }

    #[test]
    fn sections_stack_vertically() {
        let layout = PageLayout::compute(&[pack("a", 4), pack("b", 1)], 4, 40);
        assert_eq!(layout.sections[0].bounds, Rect::new(0, 0, 40, 4));
        assert_eq!(layout.sections[1].bounds.y, 4);
        assert_eq!(layout.settings.y, 8);
        assert_eq!(layout.content_height, 12);
    }

    #[test]
    fn cells_wrap_at_per_row() {
        let layout = PageLayout::compute(&[pack("a", 3)], 2, 20);
        let cells = &layout.sections[0].cells;
        assert_eq!(cells[1].bounds, Rect::new(10, 1, 10, 2));
        assert_eq!(cells[2].bounds, Rect::new(0, 3, 10, 2));
    }

    #[test]
    fn empty_pack_has_title_only() {
        let layout = PageLayout::compute(&[pack("a", 0)], 4, 40);
        assert_eq!(layout.sections[0].bounds.height, TITLE_HEIGHT + SECTION_SPACING);
    }

    #[test]
    fn cell_hit_testing() {
        let layout = PageLayout::compute(&[pack("a", 5)], 4, 40);
        let (section, cell) = layout.cell_at(2, 3).unwrap();
        assert_eq!(layout.sections[section].pack_id, "a");
        assert_eq!(layout.sections[section].cells[cell].item_id, "a-4");
        assert!(layout.cell_at(12, 3).is_none());
        assert!(layout.cell_at(39, 0).is_none());
    }

    #[test]
    fn section_tops_include_settings() {
        let layout = PageLayout::compute(&[pack("a", 1)], 4, 40);
        assert_eq!(layout.section_top("a"), Some(0));
        assert_eq!(layout.section_top(SETTINGS_SECTION_ID), Some(layout.settings.y));
        assert_eq!(layout.section_top("missing"), None);
    }

    #[test]
    fn leading_rows_push_sections_down() {
        let layout = PageLayout::compute_below(2, &[pack("a", 1)], 4, 40);
        assert_eq!(layout.section_top("a"), Some(2));
        assert_eq!(layout.content_height, 2 + 4 + SETTINGS_HEIGHT);
    }

    #[test]
    fn indicators_sit_side_by_side() {
        let nav = NavLayout::compute([("a", "Cats"), ("b", "A very long pack title")]);
        assert_eq!(nav.indicators[0].bounds, Rect::new(0, 0, 6, 1));
        assert_eq!(nav.indicators[1].bounds.x, 6);
        assert_eq!(nav.indicators[1].bounds.width, INDICATOR_LABEL_CHARS as i32 + 2);
        assert_eq!(nav.indicator_at(7).unwrap().id, "b");
        assert_eq!(nav.max_scroll(10), nav.content_width - 10);
    }
}

//! Keeps the navigation strip aligned with the visible sections.
//!
//! Section containers are observed against the pack list viewport. Each batch
//! toggles the matching indicators between visible and hidden, then asks
//! [`select_scroll_correction`] whether the strip must scroll so that a newly
//! visible indicator is not cut off.

use std::collections::HashSet;

use super::layout::NavLayout;
use super::subscription::{ElementId, Rect, Visibility, VisibilityEvent};

/// Strip scroll requested after a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollCorrection {
    /// Align the indicator's left edge with the strip start.
    Start(String),
    /// Align the indicator's right edge with the strip end.
    End(String),
}

impl ScrollCorrection {
    /// Indicator the correction targets.
    #[must_use]
    pub fn indicator(&self) -> &str {
        match self {
            Self::Start(id) | Self::End(id) => id,
        }
    }

    /// Strip scroll offset realising the correction, clamped to the strip.
    #[must_use]
    pub fn scroll_offset(&self, nav: &NavLayout, strip_width: usize) -> Option<i32> {
        let bounds = nav.get(self.indicator())?.bounds;
        let width = i32::try_from(strip_width).unwrap_or(i32::MAX);
        let offset = match self {
            Self::Start(_) => bounds.x,
            Self::End(_) => bounds.right() - width,
        };
        Some(offset.clamp(0, nav.max_scroll(strip_width)))
    }
}

/// Chooses the single scroll correction for one batch.
///
/// `entered` lists the indicators whose sections entered the viewport in this
/// batch, in batch order, with bounds relative to the visible strip (column 0
/// is the strip start). Walking them in order, an indicator starting before
/// the furthest-left seen so far becomes the left candidate; only indicators
/// that are not left candidates can become the right candidate by ending past
/// the furthest-right seen so far. The left candidate wins when both exist.
///
/// # Examples
///
/// ```
/// use stickerpicker::viewport::{select_scroll_correction, Rect, ScrollCorrection};
///
/// let entered = [("a", Rect::new(-4, 0, 6, 1)), ("b", Rect::new(28, 0, 6, 1))];
/// assert_eq!(
///     select_scroll_correction(entered, 30),
///     Some(ScrollCorrection::Start("a".into()))
/// );
/// ```
pub fn select_scroll_correction<'a>(
    entered: impl IntoIterator<Item = (&'a str, Rect)>,
    strip_width: i32,
) -> Option<ScrollCorrection> {
    let mut min_x = 0;
    let mut min_id: Option<&str> = None;
    let mut max_x = strip_width;
    let mut max_id: Option<&str> = None;

    for (id, bounds) in entered {
        if bounds.x < min_x {
            min_x = bounds.x;
            min_id = Some(id);
        } else if bounds.right() > max_x {
            max_x = bounds.right();
            max_id = Some(id);
        }
    }

    min_id
        .map(|id| ScrollCorrection::Start(id.to_string()))
        .or_else(|| max_id.map(|id| ScrollCorrection::End(id.to_string())))
}

/// Indicator visibility state.
///
/// Indicators start hidden.
#[derive(Debug, Clone, Default)]
pub struct NavSynchronizer {
    visible: HashSet<String>,
}

impl NavSynchronizer {
    /// Applies a section visibility batch.
    ///
    /// `nav_scroll` is the current strip scroll offset; the returned correction
    /// still has to be applied by the caller.
    pub fn apply(
        &mut self,
        batch: &[VisibilityEvent],
        nav: &NavLayout,
        nav_scroll: i32,
        strip_width: usize,
    ) -> Option<ScrollCorrection> {
        let mut entered = Vec::new();

        for event in batch {
            let ElementId::Section(id) = &event.element else {
                continue;
            };
            match event.change {
                Visibility::Entered => {
                    self.visible.insert(id.clone());
                    if let Some(indicator) = nav.get(id) {
                        let b = indicator.bounds;
                        entered.push((id.as_str(), Rect::new(b.x - nav_scroll, b.y, b.width, b.height)));
                    }
                }
                Visibility::Left => {
                    self.visible.remove(id);
                }
            }
        }

        let width = i32::try_from(strip_width).unwrap_or(i32::MAX);
        let correction = select_scroll_correction(entered, width);
        if let Some(c) = &correction {
            tracing::debug!(indicator = c.indicator(), "nav strip scroll correction");
        }
        correction
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    /// Hides every indicator.
    pub fn disconnect(&mut self) {
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str) -> ElementId {
        ElementId::Section(id.to_string())
    }

    #[test]
    fn leftmost_overflow_wins() {
        let entered = [
            ("right", Rect::new(25, 0, 10, 1)),
            ("far-left", Rect::new(-12, 0, 6, 1)),
            ("left", Rect::new(-3, 0, 6, 1)),
        ];
        assert_eq!(
            select_scroll_correction(entered, 30),
            Some(ScrollCorrection::Start("far-left".into()))
        );
    }

    #[test]
    fn rightmost_overflow_used_without_left_candidate() {
        let entered = [("a", Rect::new(26, 0, 6, 1)), ("b", Rect::new(32, 0, 6, 1))];
        assert_eq!(
            select_scroll_correction(entered, 30),
            Some(ScrollCorrection::End("b".into()))
        );
    }

    #[test]
    fn fully_visible_indicators_need_no_correction() {
        let entered = [("a", Rect::new(0, 0, 6, 1)), ("b", Rect::new(24, 0, 6, 1))];
        assert_eq!(select_scroll_correction(entered, 30), None);
    }

    #[test]
    fn left_candidate_is_not_also_right_candidate() {
        // Wider than the strip on both sides: only the start rule applies.
        let entered = [("wide", Rect::new(-2, 0, 40, 1))];
        assert_eq!(
            select_scroll_correction(entered, 30),
            Some(ScrollCorrection::Start("wide".into()))
        );
    }

    #[test]
    fn batches_toggle_visibility() {
        let nav = NavLayout::compute([("a", "Alpha"), ("b", "Beta")]);
        let mut sync = NavSynchronizer::default();
        assert!(!sync.is_visible("a"));

        sync.apply(&[VisibilityEvent::entered(section("a"))], &nav, 0, 40);
        assert!(sync.is_visible("a"));

        sync.apply(
            &[VisibilityEvent::left(section("a")), VisibilityEvent::entered(section("b"))],
            &nav,
            0,
            40,
        );
        assert!(!sync.is_visible("a"));
        assert!(sync.is_visible("b"));
    }

    #[test]
    fn correction_accounts_for_strip_scroll() {
        let nav = NavLayout::compute([("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")]);
        let mut sync = NavSynchronizer::default();

        // Strip scrolled past "a": its indicator starts before the strip start.
        let correction = sync.apply(&[VisibilityEvent::entered(section("a"))], &nav, 3, 8);
        assert_eq!(correction, Some(ScrollCorrection::Start("a".into())));
        assert_eq!(correction.unwrap().scroll_offset(&nav, 8), Some(0));
    }

    #[test]
    fn end_correction_aligns_right_edge() {
        let nav = NavLayout::compute([("a", "Alpha"), ("b", "Beta")]);
        let correction = ScrollCorrection::End("b".into());
        // "Alpha" is 7 wide and "Beta" 6 wide, so "b" ends at column 13.
        assert_eq!(correction.scroll_offset(&nav, 10), Some(3));
    }
}

//! View model computation.
//!
//! Turns [`AppState`] into a [`UIViewModel`]: picks the status screen or the
//! list window, truncates labels, marks the selection and search matches and
//! shifts the navigation strip by its scroll offset.

use super::modes::{BrowseMode, LoadPhase};
use super::settings::settings_rows;
use super::state::{to_i32, AppState};
use crate::search;
use crate::ui::viewmodel::{
    AltSourcePanel, BodyView, DisplayCell, FooterInfo, ListLine, NavBarInfo, NavIndicator, SearchBarInfo, StatusKind,
    StatusScreen, UIViewModel,
};
use crate::viewport::{ElementId, ALT_SOURCE_INDICATOR_ID, CELL_HEIGHT, TITLE_HEIGHT};

const SEARCH_PLACEHOLDER: &str = "Search stickers...";
const NO_MATCHES: &str = "No stickers match your search";

impl AppState {
    /// Computes the complete UI view model from current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let footer = FooterInfo {
            keybindings: self.keybindings().to_string(),
        };

        let status = match &self.phase {
            LoadPhase::Loading => Some(StatusScreen {
                kind: StatusKind::Loading,
                message: "Loading packs...".to_string(),
                subtitle: String::new(),
            }),
            LoadPhase::Error(message) => Some(StatusScreen {
                kind: StatusKind::Error,
                message: "Failed to load packs".to_string(),
                subtitle: message.clone(),
            }),
            LoadPhase::Empty => Some(StatusScreen {
                kind: StatusKind::Empty,
                message: "No packs found".to_string(),
                subtitle: String::new(),
            }),
            LoadPhase::Ready => None,
        };
        if let Some(status) = status {
            return UIViewModel {
                nav: None,
                search_bar: None,
                body: BodyView::Status(status),
                footer,
            };
        }

        let nav = Some(self.nav_bar());
        if self.mode == BrowseMode::ViewingAlternateSource {
            return UIViewModel {
                nav,
                search_bar: None,
                body: BodyView::AlternateSource(self.alt_panel()),
                footer,
            };
        }

        UIViewModel {
            nav,
            search_bar: Some(SearchBarInfo {
                query: self.search_input.clone(),
                placeholder: SEARCH_PLACEHOLDER.to_string(),
            }),
            body: BodyView::List(self.list_lines()),
            footer,
        }
    }

    fn nav_bar(&self) -> NavBarInfo {
        let viewing_alt = self.mode == BrowseMode::ViewingAlternateSource;
        let indicators = self
            .nav_layout
            .indicators
            .iter()
            .map(|indicator| NavIndicator {
                label: indicator.label.clone(),
                x: indicator.bounds.x - self.nav_scroll,
                width: indicator.bounds.width,
                highlighted: if indicator.id == ALT_SOURCE_INDICATOR_ID {
                    viewing_alt
                } else {
                    !viewing_alt && self.nav.is_visible(&indicator.id)
                },
            })
            .collect();
        NavBarInfo { indicators }
    }

    fn alt_panel(&self) -> AltSourcePanel {
        let mut lines = vec![
            "Search animated stickers from GIPHY.".to_string(),
            String::new(),
        ];
        if let Some(alt) = &self.alt_source {
            if !alt.mxc_prefix.is_empty() {
                lines.push(format!("Media is served from {}", alt.mxc_prefix));
            }
        }
        lines.push("Press Tab to go back to your packs.".to_string());
        AltSourcePanel {
            title: "GIPHY".to_string(),
            lines,
        }
    }

    /// Renders content rows `list_scroll..list_scroll + list_rows`.
    fn list_lines(&self) -> Vec<ListLine> {
        let rows = self.list_rows();
        let first = self.list_scroll;
        let last = first + to_i32(rows);
        let mut lines = vec![ListLine::Blank; rows];
        let mut put = |y: i32, line: ListLine| {
            if (first..last).contains(&y) {
                if let Ok(index) = usize::try_from(y - first) {
                    lines[index] = line;
                }
            }
        };

        if self.shows_no_matches() {
            put(0, ListLine::Notice(NO_MATCHES.to_string()));
        }

        let term = self.search_term();
        let per_row = self.settings.stickers_per_row();
        let cell_width = usize::try_from(self.page.cell_width).unwrap_or(1);

        for (index, (geometry, pack)) in self.page.sections.iter().zip(self.sections()).enumerate() {
            let top = geometry.bounds.y;
            put(top, ListLine::SectionTitle(geometry.title.clone()));

            for (row, chunk) in pack.stickers.chunks(per_row).enumerate() {
                let y = top + TITLE_HEIGHT + to_i32(row) * CELL_HEIGHT;
                if !(first..last).contains(&y) {
                    continue;
                }
                let cells = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, item)| {
                        let position = row * per_row + col;
                        let label = truncate(&item.body, cell_width.saturating_sub(3));
                        let highlight = search::highlight_range(&term, &label)
                            .filter(|range| range.end <= label.chars().count());
                        DisplayCell {
                            loaded: self.lazy.is_loaded(&ElementId::cell(geometry.pack_id.as_str(), item.id.as_str())),
                            is_selected: self
                                .cursor
                                .is_some_and(|c| c.section == index && c.item == position),
                            highlight,
                            label,
                            width: cell_width,
                        }
                    })
                    .collect();
                put(y, ListLine::Cells(cells));
            }
        }

        let settings_top = self.page.settings.y;
        put(settings_top, ListLine::SectionTitle("Settings".to_string()));
        for row in settings_rows(&self.settings) {
            put(settings_top + row.offset, ListLine::Settings(row));
        }

        lines
    }

    fn keybindings(&self) -> &'static str {
        match (&self.phase, self.mode) {
            (LoadPhase::Loading, _) => "Ctrl+r: Reload | Esc: Close",
            (LoadPhase::Error(_) | LoadPhase::Empty, _) => "Ctrl+r: Retry | Esc: Close",
            (LoadPhase::Ready, BrowseMode::ViewingAlternateSource) => "Tab: Packs | Ctrl+r: Reload | Esc: Close",
            (LoadPhase::Ready, BrowseMode::Searching) => {
                "Type to search | ←↑↓→: Move | Enter: Send | Esc: Clear"
            }
            (LoadPhase::Ready, BrowseMode::Browsing) => {
                "Type to search | ←↑↓→: Move | Enter: Send | Ctrl+n/p: Section | Alt+=/-: Columns | Ctrl+t: Theme | Esc: Close"
            }
        }
    }
}

/// Truncates `text` to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThemeName;
    use crate::infrastructure::{index_location, packs_base};
    use crate::loader::FetchResponse;
    use crate::app::Action;

    fn ready_state() -> AppState {
        let base = packs_base("https://example.org/packs/").unwrap();
        let index = index_location(&base, None).unwrap();
        let mut state = AppState::new(base, index, ThemeName::Dark);
        state.resize(20, 80);
        let request = state.start().unwrap();
        let actions = state
            .apply_fetch(FetchResponse::for_request(&request, 200, r#"{"packs":["cats.json"]}"#))
            .unwrap();
        let Some(Action::Fetch(next)) = actions.first().cloned() else {
            panic!("expected pack fetch");
        };
        let body = r#"{"id":"cats","title":"Cats","stickers":[
            {"id":"c1","url":"mxc://x/1","body":"grumpy cat"},
            {"id":"c2","url":"mxc://x/2","body":"happy"}]}"#;
        state.apply_fetch(FetchResponse::for_request(&next, 200, body));
        state
    }

    #[test]
    fn loading_shows_status_screen() {
        let base = packs_base("https://example.org/").unwrap();
        let index = index_location(&base, None).unwrap();
        let state = AppState::new(base, index, ThemeName::Light);
        let vm = state.compute_viewmodel();
        assert!(vm.nav.is_none());
        assert!(matches!(vm.body, BodyView::Status(StatusScreen { kind: StatusKind::Loading, .. })));
    }

    #[test]
    fn error_screen_carries_reason() {
        let base = packs_base("https://example.org/").unwrap();
        let index = index_location(&base, None).unwrap();
        let mut state = AppState::new(base, index, ThemeName::Light);
        let request = state.start().unwrap();
        state.apply_fetch(FetchResponse::for_request(&request, 500, ""));
        let BodyView::Status(status) = state.compute_viewmodel().body else {
            panic!("expected status screen");
        };
        assert_eq!(status.message, "Failed to load packs");
        assert!(status.subtitle.contains("Internal Server Error"));
    }

    #[test]
    fn list_starts_with_frequently_used_then_packs() {
        let state = ready_state();
        let BodyView::List(lines) = state.compute_viewmodel().body else {
            panic!("expected list");
        };
        assert_eq!(lines[0], ListLine::SectionTitle("Frequently used".to_string()));
        let cats = lines
            .iter()
            .position(|l| *l == ListLine::SectionTitle("Cats".to_string()))
            .unwrap();
        let ListLine::Cells(cells) = &lines[cats + 1] else {
            panic!("expected cells below title");
        };
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.loaded));
    }

    #[test]
    fn search_marks_matches_and_notice() {
        let mut state = ready_state();
        state.push_search_char('c');
        state.push_search_char('a');
        let BodyView::List(lines) = state.compute_viewmodel().body else {
            panic!("expected list");
        };
        let ListLine::Cells(cells) = &lines[1] else {
            panic!("expected cells");
        };
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].highlight, Some(7..9));

        state.push_search_char('z');
        let BodyView::List(lines) = state.compute_viewmodel().body else {
            panic!("expected list");
        };
        assert_eq!(lines[0], ListLine::Notice(NO_MATCHES.to_string()));
    }

    #[test]
    fn visible_sections_light_their_indicators() {
        let state = ready_state();
        let nav = state.compute_viewmodel().nav.unwrap();
        let labels: Vec<&str> = nav.indicators.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Recent", "Cats", "Settings"]);
        assert!(nav.indicators[1].highlighted);
    }

    #[test]
    fn truncation_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(truncate("abc", 0), "");
    }
}

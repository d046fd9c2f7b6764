//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to specialized component renderers

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BodyView, UIViewModel};

/// Renders the plugin UI to stdout at the state's terminal size.
///
/// Prints ANSI-styled output with absolute cursor positioning. Does not clear
/// the screen.
pub fn render(state: &AppState) {
    let viewmodel = state.compute_viewmodel();

    render_viewmodel(&viewmodel, &state.theme, state.rows, state.cols);
}

/// Chooses between the status screen and the full picker layout.
fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    if matches!(vm.body, BodyView::Status(_)) {
        components::render_status_mode(vm, theme, cols, rows);
    } else {
        components::render_content_mode(vm, theme, cols, rows);
    }
}

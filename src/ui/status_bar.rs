//! Status bar UI rendering.
//!
//! Handles the bottom status bar: loading indicator, error message, group
//! counts, page controls, and the ignore-asset filter toggle.

use crate::app::AppState;
use eframe::egui;
use egui::RichText;

/// Result of status bar interactions.
pub enum StatusBarInteraction {
    /// The user navigated to another page (zero-based).
    PageRequested(usize),
    /// The ignore-asset filter was toggled.
    IgnoreFilterToggled(bool),
}

/// Renders the status panel at the bottom of the window.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) -> Option<StatusBarInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if state.loading.is_visible() {
            ui.spinner();
            ui.label(RichText::new("Loading...").strong());
            ui.label(RichText::new("|").strong());
        }

        if let Some(error) = &state.error_message {
            ui.label(RichText::new(error).color(egui::Color32::RED));
            ui.label(RichText::new("|").strong());
        }

        ui.label(RichText::new(format!(
            "{} of {} groups",
            state.group_list.found(),
            state.group_list.total()
        )));

        ui.label(RichText::new("|").strong());
        let page = state.group_list.page();
        let page_count = state.group_list.page_count();
        if ui.small_button("<").clicked() && page > 0 {
            interaction = Some(StatusBarInteraction::PageRequested(page - 1));
        }
        ui.label(format!("page {} / {}", page + 1, page_count));
        if ui.small_button(">").clicked() && page + 1 < page_count {
            interaction = Some(StatusBarInteraction::PageRequested(page + 1));
        }

        ui.label(RichText::new("|").strong());
        let mut ignore = state.group_list.ignore_filter_enabled();
        if ui.checkbox(&mut ignore, "Hide ignored assets").changed() {
            interaction = Some(StatusBarInteraction::IgnoreFilterToggled(ignore));
        }
    });

    interaction
}

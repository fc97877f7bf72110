//! History panel UI rendering.
//!
//! Renders the grouped history list with virtual scrolling: only the rows
//! inside the viewport window (plus overscan) are materialized, bracketed by
//! top and bottom spacers sized from the offset table.

use crate::app::AppState;
use crate::domain::flatten::{row_height, FlattenedRow, LayoutMode};
use crate::model::GroupKey;
use egui::{Color32, RichText, ScrollArea};

/// Result of history panel interactions that need to be handled by the
/// application.
pub enum PanelInteraction {
    /// The user asked a group to reveal more of its entries.
    LoadMoreRequested(GroupKey),
    /// A swap subgroup's expansion was toggled.
    SwapToggled(String),
    /// A matched-movement subgroup's expansion was toggled.
    MovementToggled(String),
}

/// Renders the history list with virtual scrolling.
///
/// Consumes a pending one-shot scroll target if the coordinator planted
/// one, and writes the observed scroll offset and viewport height back into
/// the viewport state after rendering.
pub fn render_history_panel(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelInteraction> {
    // A layout flip changes row heights; the offset window is keyed by
    // layout and rebuilds on next access.
    state.viewport.update_layout_for_width(ui.available_width());
    let layout = state.viewport.layout();

    if state.rows().is_empty() {
        ui.label("No history to display");
        return None;
    }
    let scroll_offset = state.viewport.scroll_offset();
    let viewport_height = ui.available_height();
    state.viewport.set_viewport_height(viewport_height);

    // Window the rows before entering the scroll area, so the closure only
    // touches the cloned visible slice.
    let windowed = match state.view_cache.window_for(layout) {
        Some(window) => {
            let range = window.visible_range(scroll_offset, viewport_height);
            Some((
                range.clone(),
                window.top_padding(&range),
                window.bottom_padding(&range),
            ))
        }
        None => None,
    };
    let Some((range, top_padding, bottom_padding)) = windowed else {
        return None;
    };
    let visible: Vec<FlattenedRow> = state
        .view_cache
        .rows()
        .map(|rows| rows[range.clone()].to_vec())
        .unwrap_or_default();
    let highlight_ids = state.highlight.ids();

    let mut interaction: Option<PanelInteraction> = None;

    let mut scroll_area = ScrollArea::vertical().id_salt("history_scroll_area");
    if let Some(target) = state.viewport.take_pending_scroll() {
        scroll_area = scroll_area.vertical_scroll_offset(target);
    }

    let output = scroll_area.show(ui, |ui| {
        if top_padding > 0.0 {
            ui.add_space(top_padding);
        }

        for (offset, row) in visible.iter().enumerate() {
            let height = row_height(&visible, offset, layout);
            let highlighted = highlight_ids.iter().any(|&id| row.matches_event(id));
            let fill = if highlighted {
                highlight_fill(state, row)
            } else {
                Color32::TRANSPARENT
            };

            egui::Frame::new().fill(fill).show(ui, |ui| {
                ui.allocate_ui_with_layout(
                    egui::vec2(ui.available_width(), height),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.set_min_height(height);
                        if let Some(row_interaction) = render_row(ui, row, layout) {
                            interaction = Some(row_interaction);
                        }
                    },
                );
            });
        }

        if bottom_padding > 0.0 {
            ui.add_space(bottom_padding);
        }
    });

    state.viewport.set_scroll_offset(output.state.offset.y);
    interaction
}

/// Highlight background, tinted by the first matching classification tag.
fn highlight_fill(state: &AppState, row: &FlattenedRow) -> Color32 {
    let tag = state
        .highlight
        .ids()
        .into_iter()
        .filter(|&id| row.matches_event(id))
        .find_map(|id| state.highlight.tag_for(id).map(str::to_string));
    match tag.as_deref() {
        Some("in") => Color32::from_rgb(20, 60, 20),
        Some("out") => Color32::from_rgb(70, 25, 25),
        _ => Color32::from_rgb(45, 45, 70),
    }
}

fn render_row(
    ui: &mut egui::Ui,
    row: &FlattenedRow,
    layout: LayoutMode,
) -> Option<PanelInteraction> {
    match row {
        FlattenedRow::GroupHeader { group, .. } => {
            ui.label(RichText::new(&group.label).strong());
            ui.label(RichText::new(format!("{} events", group.event_count)).weak());
            if layout == LayoutMode::Tabular {
                ui.label(RichText::new(&group.key).weak().monospace());
            }
            None
        }
        FlattenedRow::Event { event, .. } => {
            ui.add_space(12.0);
            ui.label(&event.label);
            ui.label(format!("{} {}", event.amount, event.asset));
            None
        }
        FlattenedRow::SwapRow { key, events } => {
            ui.add_space(12.0);
            ui.label(RichText::new("Swap").strong());
            ui.label(swap_summary(events));
            if ui.small_button("Expand").clicked() {
                return Some(PanelInteraction::SwapToggled(key.clone()));
            }
            None
        }
        FlattenedRow::SwapCollapse { key } => {
            ui.add_space(12.0);
            if ui.small_button("Collapse swap").clicked() {
                return Some(PanelInteraction::SwapToggled(key.clone()));
            }
            None
        }
        FlattenedRow::MatchedMovementRow { key, events } => {
            ui.add_space(12.0);
            ui.label(RichText::new("Movement").strong());
            ui.label(swap_summary(events));
            if ui.small_button("Expand").clicked() {
                return Some(PanelInteraction::MovementToggled(key.clone()));
            }
            None
        }
        FlattenedRow::MatchedMovementCollapse { key } => {
            ui.add_space(12.0);
            if ui.small_button("Collapse movement").clicked() {
                return Some(PanelInteraction::MovementToggled(key.clone()));
            }
            None
        }
        FlattenedRow::EventPlaceholder { .. } => {
            ui.add_space(12.0);
            ui.label(RichText::new("Loading event...").weak().italics());
            None
        }
        FlattenedRow::LoadMore {
            key,
            hidden_count,
            total_count,
        } => {
            ui.add_space(12.0);
            if ui
                .small_button(format!("Show {hidden_count} more of {total_count}"))
                .clicked()
            {
                return Some(PanelInteraction::LoadMoreRequested(key.clone()));
            }
            None
        }
    }
}

fn swap_summary(events: &[crate::model::HistoryEvent]) -> String {
    let legs: Vec<String> = events
        .iter()
        .map(|e| format!("{} {}", e.amount, e.asset))
        .collect();
    legs.join(" -> ")
}

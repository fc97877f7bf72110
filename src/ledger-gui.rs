//! Transaction History Viewer GUI Application
//!
//! Interactive viewer for grouped transaction histories using the egui
//! framework. The viewer features:
//! - A virtualized grouped event list with per-group load-more
//! - Swap and matched-movement subgroups, collapsible per subgroup
//! - Background group/event fetching with supersession and cancellation
//! - Deep-link style event highlighting with one-shot scroll

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use rledger::app::{AppState, HistoryCoordinator};
use rledger::io::{EventFetcher, GroupFetcher};
use rledger::providers::{EventProvider, GroupProvider};
use rledger::sample::{SampleDataset, SampleHistoryProvider};
use rledger::ui::{
    render_history_panel, render_status_bar, PanelInteraction, StatusBarInteraction,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Artificial provider latency so loading states are observable in the demo.
const DEMO_LATENCY: Duration = Duration::from_millis(250);

/// Main application entry point.
fn main() -> eframe::Result {
    // Optional first argument: a dataset JSON file produced by
    // ledger-histgen. Without it, the built-in sample dataset is used.
    let dataset_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Transaction History Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Transaction History Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(HistoryViewerApp::new(dataset_file)))),
    )
}

/// The main history viewer application.
///
/// Delegates all coordination to `HistoryCoordinator`; this struct only
/// owns the state, the fetchers, and the provider.
struct HistoryViewerApp {
    state: AppState,
    group_fetcher: GroupFetcher,
    event_fetcher: EventFetcher,
    group_provider: Arc<dyn GroupProvider>,
    event_provider: Arc<dyn EventProvider>,
    load_error: Option<String>,
}

impl HistoryViewerApp {
    fn new(dataset_file: Option<PathBuf>) -> Self {
        let mut load_error = None;
        let dataset = match &dataset_file {
            Some(path) => match SampleDataset::load_from_file(path) {
                Ok(dataset) => dataset,
                Err(error) => {
                    load_error = Some(format!(
                        "Error loading dataset {}: {error}",
                        path.display()
                    ));
                    SampleDataset::default_dataset()
                }
            },
            None => SampleDataset::default_dataset(),
        };
        let provider =
            Arc::new(SampleHistoryProvider::from_dataset(dataset).with_latency(DEMO_LATENCY));

        let mut state = AppState::new();
        state
            .group_list
            .set_ignored_assets(["AIRDROP-SPAM".to_string()].into());

        Self {
            state,
            group_fetcher: GroupFetcher::new(),
            event_fetcher: EventFetcher::new(),
            group_provider: provider.clone(),
            event_provider: provider,
            load_error,
        }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction) {
        match interaction {
            PanelInteraction::LoadMoreRequested(key) => {
                HistoryCoordinator::handle_load_more(&mut self.state, &key);
            }
            PanelInteraction::SwapToggled(key) => {
                HistoryCoordinator::handle_swap_toggle(&mut self.state, &key);
            }
            PanelInteraction::MovementToggled(key) => {
                HistoryCoordinator::handle_movement_toggle(&mut self.state, &key);
            }
        }
    }

    fn handle_status_interaction(&mut self, interaction: StatusBarInteraction) {
        match interaction {
            StatusBarInteraction::PageRequested(page) => {
                HistoryCoordinator::handle_page_change(&mut self.state, page);
            }
            StatusBarInteraction::IgnoreFilterToggled(enabled) => {
                HistoryCoordinator::handle_ignore_filter_toggle(&mut self.state, enabled);
            }
        }
    }
}

impl eframe::App for HistoryViewerApp {
    /// Main update loop: run one coordination frame, then render panels
    /// and feed interactions back.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(error) = self.load_error.take() {
            self.state.error_message = Some(error);
        }

        HistoryCoordinator::frame(
            &mut self.state,
            &mut self.group_fetcher,
            &mut self.event_fetcher,
            &self.group_provider,
            &self.event_provider,
            Some(ctx),
        );

        let mut status_interaction = None;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            status_interaction = render_status_bar(ui, &self.state);
        });

        let mut panel_interaction = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            panel_interaction = render_history_panel(ui, &mut self.state);
        });

        if let Some(interaction) = panel_interaction {
            self.handle_panel_interaction(interaction);
        }
        if let Some(interaction) = status_interaction {
            self.handle_status_interaction(interaction);
        }

        // Repaint while fetches are pending so poll() keeps running.
        if self.group_fetcher.is_in_flight() || self.event_fetcher.is_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

//! History-level coordination and workflow management.
//!
//! Handles high-level operations: keeping the background fetchers in sync
//! with the visible state, applying completed fetches, planning the
//! highlight scroll, and reacting to list interactions.

use crate::app::AppState;
use crate::io::{EventFetchOutcome, EventFetcher, GroupFetchOutcome, GroupFetcher};
use crate::model::FilterParams;
use crate::providers::{EventProvider, GroupProvider};
use crate::state::HighlightEntry;
use crate::ui::highlight_nav::{locate_highlight_indices, plan_scroll, ScrollPlan};
use std::sync::Arc;

/// Coordinates fetching, derived-state rebuilds, and scroll planning.
///
/// This struct is responsible for:
/// - Issuing and superseding background fetches
/// - Applying poll results to application state
/// - Running the one-shot highlight scroll planning
/// - Handling list interactions (load-more, toggles, page changes)
pub struct HistoryCoordinator;

impl HistoryCoordinator {
    /// Runs one frame of coordination: apply results, issue fetches, feed
    /// the loading debounce, plan the highlight scroll.
    pub fn frame(
        state: &mut AppState,
        group_fetcher: &mut GroupFetcher,
        event_fetcher: &mut EventFetcher,
        group_provider: &Arc<dyn GroupProvider>,
        event_provider: &Arc<dyn EventProvider>,
        repaint: Option<&egui::Context>,
    ) {
        Self::poll_fetches(state, group_fetcher, event_fetcher);
        Self::sync_fetches(
            state,
            group_fetcher,
            event_fetcher,
            group_provider,
            event_provider,
            repaint,
        );
        state
            .loading
            .update(group_fetcher.is_in_flight() || event_fetcher.is_in_flight());
        Self::plan_highlight(state);
    }

    /// Issues fetches whenever the page, filters, or visible group set have
    /// drifted from the last issued requests.
    ///
    /// An empty visible set clears event state immediately instead of
    /// fetching; there is nothing a fetch could return for it.
    pub fn sync_fetches(
        state: &mut AppState,
        group_fetcher: &mut GroupFetcher,
        event_fetcher: &mut EventFetcher,
        group_provider: &Arc<dyn GroupProvider>,
        event_provider: &Arc<dyn EventProvider>,
        repaint: Option<&egui::Context>,
    ) {
        let filter = state.group_list.filter().clone();

        if group_fetcher.needs_request(state.group_list.page(), &filter) {
            group_fetcher.request(
                group_provider.clone(),
                state.group_list.page(),
                state.group_list.limit(),
                filter.clone(),
                repaint.cloned(),
            );
        }

        let keys = state.group_list.visible_keys();
        if keys.is_empty() {
            if event_fetcher.is_in_flight() || !state.events.complete().is_empty() {
                event_fetcher.reset();
                state.events.clear();
                state.view_cache.invalidate();
            }
        } else if event_fetcher.needs_request(&keys, &filter) {
            event_fetcher.request(event_provider.clone(), keys, filter, repaint.cloned());
        }
    }

    /// Applies completed fetches to application state.
    ///
    /// Called once per frame in the update loop. Stale and cancelled results
    /// are ignored without touching state; genuine failures surface as the
    /// error message while the previously displayed data stays intact.
    pub fn poll_fetches(
        state: &mut AppState,
        group_fetcher: &mut GroupFetcher,
        event_fetcher: &mut EventFetcher,
    ) {
        match group_fetcher.poll() {
            GroupFetchOutcome::Applied(page) => {
                let page_count = page.page_count();
                state.group_list.apply_page(page);
                state.view_cache.invalidate_rows();
                state.error_message = None;

                // A shrunken filter result can strand the page index past
                // the end; clamp and let the next sync refetch.
                if state.group_list.page() >= page_count {
                    state.group_list.set_page(page_count - 1);
                }
            }
            GroupFetchOutcome::Failed(message) => {
                state.error_message = Some(format!("Error fetching groups: {message}"));
            }
            GroupFetchOutcome::Stale
            | GroupFetchOutcome::Cancelled
            | GroupFetchOutcome::Pending => {}
        }

        match event_fetcher.poll() {
            EventFetchOutcome::Applied(events) => {
                let ignored = state.group_list.ignored_assets().clone();
                state.events.apply_events(
                    &events,
                    &ignored,
                    state.group_list.ignore_filter_enabled(),
                );
                state.view_cache.invalidate();
                state.error_message = None;
            }
            EventFetchOutcome::Failed(message) => {
                state.error_message = Some(format!("Error fetching events: {message}"));
            }
            EventFetchOutcome::Stale
            | EventFetchOutcome::Cancelled
            | EventFetchOutcome::Pending => {}
        }
    }

    /// Runs one pass of highlight scroll planning.
    ///
    /// Skipped while a fetch is raw-in-flight so the plan sees settled rows.
    /// A plan that cannot locate any highlighted row keeps the watcher alive
    /// until the wait bound expires, then gives up silently.
    pub fn plan_highlight(state: &mut AppState) {
        if !state.highlight.scroll_pending() {
            if state.highlight.expired() {
                state.highlight.mark_scrolled();
            }
            return;
        }
        if state.loading.is_raw() {
            return;
        }

        let ids = state.highlight.ids();
        let layout = state.viewport.layout();
        let indices = {
            let rows = state.rows();
            locate_highlight_indices(rows, &ids)
        };
        let rendered = state
            .view_cache
            .window_for(layout)
            .and_then(|w| w.rendered_range().cloned());

        match plan_scroll(&indices, layout, rendered.as_ref()) {
            ScrollPlan::Pending => {}
            ScrollPlan::Stay => state.highlight.mark_scrolled(),
            ScrollPlan::ToRow(index) => {
                let offset = state
                    .view_cache
                    .window_for(layout)
                    .map(|w| w.offset_of(index))
                    .unwrap_or(0.0);
                state.viewport.request_scroll_to(offset);
                state.highlight.mark_scrolled();
            }
        }
    }

    // ===== Interactions =====

    /// Replaces the highlighted identifier list and re-arms the scroll.
    pub fn set_highlights(state: &mut AppState, entries: Vec<HighlightEntry>) {
        state.highlight.set_highlights(entries);
    }

    /// Reveals more entries of a group.
    pub fn handle_load_more(state: &mut AppState, key: &str) {
        let total = state
            .events
            .displayed()
            .get(key)
            .map(Vec::len)
            .unwrap_or(0);
        state.list.load_more(key, total);
        state.view_cache.invalidate_rows();
    }

    /// Toggles a swap subgroup between collapsed and expanded.
    pub fn handle_swap_toggle(state: &mut AppState, key: &str) {
        state.list.toggle_swap_expanded(key);
        state.view_cache.invalidate_rows();
    }

    /// Toggles a matched-movement subgroup between collapsed and expanded.
    pub fn handle_movement_toggle(state: &mut AppState, key: &str) {
        state.list.toggle_movement_expanded(key);
        state.view_cache.invalidate_rows();
    }

    /// Switches to another page of groups.
    ///
    /// Resets scroll to the top unless a highlight scroll is still pending,
    /// so the two behaviors never fight over position. The refetch happens
    /// on the next sync.
    pub fn handle_page_change(state: &mut AppState, page: usize) {
        if !state.group_list.set_page(page) {
            return;
        }
        state.view_cache.invalidate_rows();
        if !state.highlight.scroll_pending() {
            state.viewport.request_scroll_to_top();
        }
    }

    /// Replaces the filter parameters, returning to the first page.
    pub fn handle_filter_change(state: &mut AppState, filter: FilterParams) {
        if !state.group_list.set_filter(filter) {
            return;
        }
        state.view_cache.invalidate_rows();
        if !state.highlight.scroll_pending() {
            state.viewport.request_scroll_to_top();
        }
    }

    /// Toggles the ignore-asset filter and refilters without refetching.
    pub fn handle_ignore_filter_toggle(state: &mut AppState, enabled: bool) {
        if state.group_list.set_ignore_filter(enabled) {
            state.refilter_events();
        }
    }
}

//! Centralized application state for the history viewer.
//!
//! This module composes focused state components that each manage one
//! aspect of the viewer's state. This approach:
//! - Keeps invariants local within each component
//! - Allows borrow-checker friendly access to different state aspects
//! - Provides intent-revealing methods for state mutations

use crate::cache::ViewCache;
use crate::domain::flatten::{flatten_groups, FlattenedRow};
use crate::io::LoadingDebounce;
use crate::state::{
    EventState, GroupListState, HighlightState, ListState, ViewportState,
};

/// Main application state composed of focused state components.
///
/// Each component has private fields to enforce invariants and
/// intent-revealing public methods. The mappings and per-group UI state are
/// owned exclusively here; the UI reads derived outputs and reports
/// interactions back through the coordinator.
pub struct AppState {
    // ===== Focused State Components =====
    /// Paginated group listing, filters, ignore toggle.
    pub group_list: GroupListState,

    /// Complete/displayed event mappings and revision.
    pub events: EventState,

    /// Per-group visible counts and subgroup expansion.
    pub list: ListState,

    /// Highlighted identifiers and one-shot scroll arming.
    pub highlight: HighlightState,

    /// Scroll offset, layout mode, pending scroll target.
    pub viewport: ViewportState,

    /// Debounced loading indicator.
    pub loading: LoadingDebounce,

    // ===== Top-Level State =====
    /// Current error message to display, if any.
    pub error_message: Option<String>,

    /// Cache of derived view values.
    pub view_cache: ViewCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new application state with default values.
    pub fn new() -> Self {
        Self {
            group_list: GroupListState::new(),
            events: EventState::new(),
            list: ListState::new(),
            highlight: HighlightState::new(),
            viewport: ViewportState::new(),
            loading: LoadingDebounce::new(),
            error_message: None,
            view_cache: ViewCache::new(),
        }
    }

    // ===== High-Level Coordination Methods =====

    /// Resets everything derived from fetched history data.
    ///
    /// Filters, pagination settings, and viewport geometry survive; the
    /// listing, event mappings, per-group UI state, and caches are dropped.
    pub fn reset_history_state(&mut self) {
        self.group_list.clear_groups();
        self.events.clear();
        self.list.clear();
        self.highlight.clear();
        self.error_message = None;
        self.view_cache.invalidate();
    }

    /// The flattened row sequence, recomputing it when the cache is stale.
    pub fn rows(&mut self) -> &[FlattenedRow] {
        if self.view_cache.rows().is_none() {
            let rows = flatten_groups(
                self.group_list.groups(),
                self.events.displayed(),
                &self.list,
                self.events.hidden_ignored(),
                self.events.fetched_counts(),
            );
            self.view_cache.set_rows(rows);
        }
        self.view_cache.rows().unwrap_or(&[])
    }

    /// Full operation scope for one displayed event: its complete subgroup
    /// when it belongs to one (including legs the ignore filter hides),
    /// otherwise every event of its group.
    ///
    /// Goes through the revision-keyed resolver cache, so repeated lookups
    /// between fetches reuse one reverse index.
    pub fn event_operation_scope(
        &mut self,
        key: &str,
        event: &crate::model::HistoryEvent,
    ) -> Vec<crate::model::HistoryEvent> {
        let resolver = self
            .view_cache
            .resolver_for(self.events.revision(), self.events.complete());
        resolver.complete_events_for_item(self.events.complete(), key, event)
    }

    /// Recomputes the displayed mapping after an ignore-filter change.
    pub fn refilter_events(&mut self) {
        let ignored = self.group_list.ignored_assets().clone();
        self.events
            .refilter(&ignored, self.group_list.ignore_filter_enabled());
        self.view_cache.invalidate_rows();
    }
}

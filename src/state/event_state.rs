//! Fetched event state: complete and displayed mappings.

use crate::domain::grouping::{
    build_complete_mapping, build_displayed_mapping, hidden_ignored_groups,
};
use crate::model::{AssetId, EventMapping, GroupKey, HistoryEvent};
use std::collections::{HashMap, HashSet};

/// State derived from the last applied event fetch.
///
/// Owns the complete and displayed mappings exclusively; everything else
/// reads them through the queries here. The revision counter increments on
/// every applied fetch so caches keyed on the complete mapping know when to
/// rebuild.
#[derive(Debug, Clone, Default)]
pub struct EventState {
    complete: EventMapping,
    displayed: EventMapping,
    /// Groups whose subgroups lost members to the ignore filter; these are
    /// force-expanded so a truncated pair is never shown collapsed.
    hidden_ignored: HashSet<GroupKey>,
    /// Raw per-group event count of the last applied fetch, before hiding
    /// or filtering. Placeholder shortfalls are measured against this.
    fetched_counts: HashMap<GroupKey, usize>,
    revision: u64,
}

impl EventState {
    /// Creates an empty event state.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Queries =====

    /// The complete mapping (hidden events excluded, nothing else filtered).
    pub fn complete(&self) -> &EventMapping {
        &self.complete
    }

    /// The displayed mapping (ignore filter applied when enabled).
    pub fn displayed(&self) -> &EventMapping {
        &self.displayed
    }

    /// Groups with partially filtered subgroups, to be force-expanded.
    pub fn hidden_ignored(&self) -> &HashSet<GroupKey> {
        &self.hidden_ignored
    }

    /// Raw fetched event count per group, hidden events included.
    pub fn fetched_counts(&self) -> &HashMap<GroupKey, usize> {
        &self.fetched_counts
    }

    /// Revision of the complete mapping, bumped per applied fetch.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ===== Mutations =====

    /// Applies a completed event fetch, rebuilding both mappings.
    pub fn apply_events(
        &mut self,
        events: &[HistoryEvent],
        ignored: &HashSet<AssetId>,
        filter_enabled: bool,
    ) {
        self.complete = build_complete_mapping(events);
        self.fetched_counts.clear();
        for event in events {
            *self.fetched_counts.entry(event.group_key.clone()).or_default() += 1;
        }
        self.refilter(ignored, filter_enabled);
        self.revision += 1;
    }

    /// Recomputes the displayed mapping from the current complete mapping.
    ///
    /// Used when the ignore filter or the ignored set changes without a new
    /// fetch. The revision is untouched; it tracks the complete mapping.
    pub fn refilter(&mut self, ignored: &HashSet<AssetId>, filter_enabled: bool) {
        self.displayed = build_displayed_mapping(&self.complete, ignored, filter_enabled);
        self.hidden_ignored = hidden_ignored_groups(&self.complete, &self.displayed);
    }

    /// Drops all event state, e.g. when the visible group set becomes empty.
    pub fn clear(&mut self) {
        self.complete.clear();
        self.displayed.clear();
        self.hidden_ignored.clear();
        self.fetched_counts.clear();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventKind;

    fn event(id: u64, asset: &str, kind: EventKind) -> HistoryEvent {
        HistoryEvent {
            identifier: id,
            group_key: "g1".to_string(),
            asset: asset.to_string(),
            kind,
            hidden: false,
            timestamp: id as i64,
            label: "event".to_string(),
            amount: 1.0,
        }
    }

    #[test]
    fn test_apply_events_builds_both_mappings() {
        let mut state = EventState::new();
        let events = vec![
            event(1, "ETH", EventKind::TradeLeg),
            event(2, "DAI", EventKind::TradeLeg),
        ];
        state.apply_events(&events, &HashSet::new(), false);

        assert_eq!(state.revision(), 1);
        assert_eq!(state.complete(), state.displayed());
        assert!(state.hidden_ignored().is_empty());
    }

    #[test]
    fn test_refilter_flags_partially_hidden_subgroup() {
        let mut state = EventState::new();
        let events = vec![
            event(1, "ETH", EventKind::TradeLeg),
            event(2, "SPAM", EventKind::TradeLeg),
        ];
        let ignored: HashSet<AssetId> = ["SPAM".to_string()].into();

        state.apply_events(&events, &ignored, true);
        assert!(state.hidden_ignored().contains("g1"));
        assert_eq!(state.revision(), 1);

        // Disabling the filter restores the full view without a new fetch.
        state.refilter(&ignored, false);
        assert!(state.hidden_ignored().is_empty());
        assert_eq!(state.complete(), state.displayed());
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn test_fetched_counts_include_hidden_events() {
        let mut state = EventState::new();
        let mut hidden = event(2, "ETH", EventKind::Standard);
        hidden.hidden = true;
        state.apply_events(
            &[event(1, "ETH", EventKind::Standard), hidden],
            &HashSet::new(),
            false,
        );

        // Hidden events vanish from the mappings but were still fetched.
        assert_eq!(state.displayed()["g1"].len(), 1);
        assert_eq!(state.fetched_counts()["g1"], 2);

        state.clear();
        assert!(state.fetched_counts().is_empty());
    }

    #[test]
    fn test_clear_bumps_revision() {
        let mut state = EventState::new();
        state.apply_events(&[event(1, "ETH", EventKind::Standard)], &HashSet::new(), false);
        state.clear();
        assert_eq!(state.revision(), 2);
        assert!(state.complete().is_empty());
    }
}

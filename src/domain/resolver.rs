//! Reverse lookup from displayed events to their complete subgroups.
//!
//! The displayed view may truncate a subgroup (ignore filter) or hand a
//! single member to an edit/delete flow. Operations on a subgroup must always
//! cover its full membership, including legs the user cannot currently see,
//! or hidden members would be silently orphaned. The resolver answers that
//! scope question in constant time via a reverse index over the complete
//! mapping.

use crate::model::{EventId, EventMapping, GroupKey, HistoryEvent};
use std::collections::HashMap;

/// Pure read-side helper over the complete mapping.
///
/// Built by scanning every group's entries once; rebuild whenever the
/// complete mapping changes (the view cache keys rebuilds by revision).
#[derive(Default)]
pub struct CompleteEventResolver {
    /// Event identity to (group key, entry index) of its owning subgroup.
    /// Plain events are not indexed.
    subgroup_index: HashMap<EventId, (GroupKey, usize)>,
}

impl CompleteEventResolver {
    /// Builds the reverse index over a complete mapping.
    pub fn build(complete: &EventMapping) -> Self {
        let mut subgroup_index = HashMap::new();
        for (key, entries) in complete {
            for (index, entry) in entries.iter().enumerate() {
                if !entry.is_subgroup() {
                    continue;
                }
                for event in entry.events() {
                    subgroup_index.insert(event.identifier, (key.clone(), index));
                }
            }
        }
        Self { subgroup_index }
    }

    /// Flattens all entries of a group (subgroups expanded) into one ordered
    /// event list. Unknown keys yield an empty list.
    pub fn group_events(&self, complete: &EventMapping, key: &str) -> Vec<HistoryEvent> {
        complete
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .flat_map(|entry| entry.events().iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Recovers the full subgroup behind a possibly filtered/truncated
    /// displayed subgroup.
    ///
    /// Looks up the first displayed member; if it is indexed, the complete
    /// subgroup is returned, otherwise the input is returned unchanged
    /// (fallback, including for empty input).
    pub fn complete_subgroup_events(
        &self,
        complete: &EventMapping,
        displayed: &[HistoryEvent],
    ) -> Vec<HistoryEvent> {
        let Some(first) = displayed.first() else {
            return displayed.to_vec();
        };
        match self.lookup_subgroup(complete, first.identifier) {
            Some(events) => events,
            None => displayed.to_vec(),
        }
    }

    /// Returns the correct operation scope for a single event: its full
    /// subgroup when it belongs to one, otherwise every event of its group.
    pub fn complete_events_for_item(
        &self,
        complete: &EventMapping,
        key: &str,
        event: &HistoryEvent,
    ) -> Vec<HistoryEvent> {
        match self.lookup_subgroup(complete, event.identifier) {
            Some(events) => events,
            None => self.group_events(complete, key),
        }
    }

    fn lookup_subgroup(&self, complete: &EventMapping, id: EventId) -> Option<Vec<HistoryEvent>> {
        let (key, index) = self.subgroup_index.get(&id)?;
        let entry = complete.get(key)?.get(*index)?;
        Some(entry.events().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grouping::build_complete_mapping;
    use crate::model::EventKind;

    fn event(id: u64, group: &str, kind: EventKind, label: &str) -> HistoryEvent {
        HistoryEvent {
            identifier: id,
            group_key: group.to_string(),
            asset: "ETH".to_string(),
            kind,
            hidden: false,
            timestamp: id as i64,
            label: label.to_string(),
            amount: 1.0,
        }
    }

    /// g1 = [approve, [swap_spend, swap_receive]]
    fn swap_fixture() -> (EventMapping, CompleteEventResolver) {
        let events = vec![
            event(1, "g1", EventKind::Standard, "approve"),
            event(2, "g1", EventKind::TradeLeg, "spend"),
            event(3, "g1", EventKind::TradeLeg, "receive"),
        ];
        let complete = build_complete_mapping(&events);
        let resolver = CompleteEventResolver::build(&complete);
        (complete, resolver)
    }

    #[test]
    fn test_group_events_flattens_subgroups() {
        let (complete, resolver) = swap_fixture();
        let events = resolver.group_events(&complete, "g1");
        let ids: Vec<u64> = events.iter().map(|e| e.identifier).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_group_events_unknown_key_is_empty() {
        let (complete, resolver) = swap_fixture();
        assert!(resolver.group_events(&complete, "missing").is_empty());
    }

    #[test]
    fn test_item_in_subgroup_resolves_to_full_subgroup() {
        let (complete, resolver) = swap_fixture();
        let spend = event(2, "g1", EventKind::TradeLeg, "spend");

        let scope = resolver.complete_events_for_item(&complete, "g1", &spend);
        let ids: Vec<u64> = scope.iter().map(|e| e.identifier).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_item_outside_subgroup_resolves_to_whole_group() {
        let (complete, resolver) = swap_fixture();
        let approve = event(1, "g1", EventKind::Standard, "approve");

        let scope = resolver.complete_events_for_item(&complete, "g1", &approve);
        let ids: Vec<u64> = scope.iter().map(|e| e.identifier).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_truncated_subgroup_recovers_hidden_leg() {
        let (complete, resolver) = swap_fixture();
        // The displayed view shows only one leg of the swap.
        let displayed = vec![event(3, "g1", EventKind::TradeLeg, "receive")];

        let full = resolver.complete_subgroup_events(&complete, &displayed);
        let ids: Vec<u64> = full.iter().map(|e| e.identifier).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_unindexed_or_empty_input_returned_unchanged() {
        let (complete, resolver) = swap_fixture();

        let empty: Vec<HistoryEvent> = Vec::new();
        assert!(resolver.complete_subgroup_events(&complete, &empty).is_empty());

        let unknown = vec![event(99, "g9", EventKind::TradeLeg, "spend")];
        let back = resolver.complete_subgroup_events(&complete, &unknown);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].identifier, 99);
    }
}

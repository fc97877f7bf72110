//! Complete and displayed mapping construction.
//!
//! The complete mapping reflects the true fetched data for every group,
//! excluding only events flagged hidden upstream. The displayed mapping is a
//! point-wise filtered view of it: when ignore-filtering is enabled, events
//! whose asset is ignored disappear, subgroups that lose every member are
//! dropped, and groups that lose every entry are dropped. Filtering never
//! mutates the complete mapping.

use crate::model::{EventMapping, GroupEntry, GroupKey, HistoryEvent};
use crate::providers::IgnoredAssets;
use std::collections::{HashMap, HashSet};

/// Builds the complete mapping from raw fetched events.
///
/// Events are grouped by group key in arrival order. Within each group, runs
/// of two or more consecutive groupable events collapse into one subgroup:
/// a run containing a movement-kind event becomes a matched-movement entry,
/// otherwise a swap. A lone groupable event stays a plain entry. Events
/// flagged hidden are excluded entirely.
pub fn build_complete_mapping(events: &[HistoryEvent]) -> EventMapping {
    let mut per_group: HashMap<GroupKey, Vec<HistoryEvent>> = HashMap::new();
    for event in events {
        if event.hidden {
            continue;
        }
        per_group
            .entry(event.group_key.clone())
            .or_default()
            .push(event.clone());
    }

    per_group
        .into_iter()
        .map(|(key, bucket)| (key, group_entries(bucket)))
        .collect()
}

/// Collapses runs of consecutive groupable events into subgroup entries.
fn group_entries(events: Vec<HistoryEvent>) -> Vec<GroupEntry> {
    let mut entries = Vec::new();
    let mut run: Vec<HistoryEvent> = Vec::new();

    for event in events {
        if event.kind.is_groupable() {
            run.push(event);
        } else {
            flush_run(&mut run, &mut entries);
            entries.push(GroupEntry::Single(event));
        }
    }
    flush_run(&mut run, &mut entries);
    entries
}

/// Emits the pending run as a subgroup (length >= 2) or a single entry.
fn flush_run(run: &mut Vec<HistoryEvent>, entries: &mut Vec<GroupEntry>) {
    match run.len() {
        0 => {}
        1 => {
            if let Some(event) = run.pop() {
                entries.push(GroupEntry::Single(event));
            }
        }
        _ => {
            let members: Vec<HistoryEvent> = run.drain(..).collect();
            entries.push(tag_subgroup(members));
        }
    }
}

/// Tags a subgroup as matched-movement when any member is movement-kind.
fn tag_subgroup(members: Vec<HistoryEvent>) -> GroupEntry {
    let has_movement = members
        .iter()
        .any(|e| e.kind == crate::model::EventKind::AssetMovement);
    if has_movement {
        GroupEntry::MatchedMovement(members)
    } else {
        GroupEntry::Swap(members)
    }
}

/// Derives the displayed mapping from the complete one.
///
/// With filtering disabled the result is structurally equal to `complete`.
/// With filtering enabled, events whose asset the predicate rejects are
/// removed; subgroups keep their variant even when reduced to one member,
/// but an emptied subgroup and an emptied group are dropped.
pub fn build_displayed_mapping(
    complete: &EventMapping,
    ignored: &dyn IgnoredAssets,
    filter_enabled: bool,
) -> EventMapping {
    if !filter_enabled {
        return complete.clone();
    }

    let mut displayed = EventMapping::new();
    for (key, entries) in complete {
        let mut kept: Vec<GroupEntry> = Vec::new();
        for entry in entries {
            match entry {
                GroupEntry::Single(event) => {
                    if !ignored.is_ignored(&event.asset) {
                        kept.push(entry.clone());
                    }
                }
                GroupEntry::Swap(events) => {
                    let members = retain_members(events, ignored);
                    if !members.is_empty() {
                        kept.push(GroupEntry::Swap(members));
                    }
                }
                GroupEntry::MatchedMovement(events) => {
                    let members = retain_members(events, ignored);
                    if !members.is_empty() {
                        kept.push(GroupEntry::MatchedMovement(members));
                    }
                }
            }
        }
        if !kept.is_empty() {
            displayed.insert(key.clone(), kept);
        }
    }
    displayed
}

fn retain_members(events: &[HistoryEvent], ignored: &dyn IgnoredAssets) -> Vec<HistoryEvent> {
    events
        .iter()
        .filter(|e| !ignored.is_ignored(&e.asset))
        .cloned()
        .collect()
}

/// Group keys where a subgroup lost some, but not all, members to the
/// ignore filter.
///
/// Such a group must render its subgroups expanded: a collapsed pair row
/// with a missing leg would misrepresent the trade.
pub fn hidden_ignored_groups(
    complete: &EventMapping,
    displayed: &EventMapping,
) -> HashSet<GroupKey> {
    // Index complete subgroup sizes by member identity so displayed
    // subgroups can be compared without relying on entry positions.
    let mut complete_sizes: HashMap<u64, usize> = HashMap::new();
    for entries in complete.values() {
        for entry in entries {
            if entry.is_subgroup() {
                for event in entry.events() {
                    complete_sizes.insert(event.identifier, entry.len());
                }
            }
        }
    }

    let mut flagged = HashSet::new();
    for (key, entries) in displayed {
        for entry in entries {
            if !entry.is_subgroup() {
                continue;
            }
            let Some(first) = entry.events().first() else {
                continue;
            };
            if let Some(&full) = complete_sizes.get(&first.identifier) {
                if entry.len() < full {
                    flagged.insert(key.clone());
                    break;
                }
            }
        }
    }
    flagged
}

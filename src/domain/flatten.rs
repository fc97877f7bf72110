//! Row flattening for the virtualized history list.
//!
//! Turns the displayed mapping plus per-group UI state into one ordered
//! sequence of typed rows with a deterministic height function. The sequence
//! is recomputed whenever the displayed mapping, a group's visible count, or
//! a subgroup's expand state changes; it is never persisted.

use crate::model::{Group, GroupEntry, GroupKey, HistoryEvent};
use crate::state::ListState;
use std::collections::{HashMap, HashSet};

/// Placeholder rows reserved for a group whose advertised event count
/// exceeds what has been fetched so far.
pub const INITIAL_PLACEHOLDER_CAP: usize = 6;

/// One addressable unit of the virtualization sequence.
///
/// Every variant carries enough data to render itself and a stable key.
#[derive(Debug, Clone, PartialEq)]
pub enum FlattenedRow {
    /// Heading row for one group.
    GroupHeader {
        key: GroupKey,
        group: Group,
    },
    /// A plain event, or one member of an expanded subgroup.
    Event {
        key: String,
        event: HistoryEvent,
    },
    /// A collapsed swap subgroup rendered as one combined row.
    SwapRow {
        key: String,
        events: Vec<HistoryEvent>,
    },
    /// Header of an expanded swap subgroup (click to collapse).
    SwapCollapse {
        key: String,
    },
    /// A collapsed matched-movement subgroup rendered as one combined row.
    MatchedMovementRow {
        key: String,
        events: Vec<HistoryEvent>,
    },
    /// Header of an expanded matched-movement subgroup.
    MatchedMovementCollapse {
        key: String,
    },
    /// Space reserved for an event that has not been fetched yet.
    EventPlaceholder {
        key: String,
    },
    /// Trailing row offering to reveal the group's remaining entries.
    LoadMore {
        key: GroupKey,
        hidden_count: usize,
        total_count: usize,
    },
}

/// Height-class tag of a flattened row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTag {
    GroupHeader,
    Event,
    SwapRow,
    SwapCollapse,
    MatchedMovementRow,
    MatchedMovementCollapse,
    EventPlaceholder,
    LoadMore,
}

impl FlattenedRow {
    /// Stable key identifying this row across recomputations.
    pub fn row_key(&self) -> &str {
        match self {
            FlattenedRow::GroupHeader { key, .. } => key,
            FlattenedRow::Event { key, .. } => key,
            FlattenedRow::SwapRow { key, .. } => key,
            FlattenedRow::SwapCollapse { key } => key,
            FlattenedRow::MatchedMovementRow { key, .. } => key,
            FlattenedRow::MatchedMovementCollapse { key } => key,
            FlattenedRow::EventPlaceholder { key } => key,
            FlattenedRow::LoadMore { key, .. } => key,
        }
    }

    /// Height-class tag for the height lookup tables.
    pub fn tag(&self) -> RowTag {
        match self {
            FlattenedRow::GroupHeader { .. } => RowTag::GroupHeader,
            FlattenedRow::Event { .. } => RowTag::Event,
            FlattenedRow::SwapRow { .. } => RowTag::SwapRow,
            FlattenedRow::SwapCollapse { .. } => RowTag::SwapCollapse,
            FlattenedRow::MatchedMovementRow { .. } => RowTag::MatchedMovementRow,
            FlattenedRow::MatchedMovementCollapse { .. } => RowTag::MatchedMovementCollapse,
            FlattenedRow::EventPlaceholder { .. } => RowTag::EventPlaceholder,
            FlattenedRow::LoadMore { .. } => RowTag::LoadMore,
        }
    }

    /// Whether this row matches a highlighted event identity.
    ///
    /// Event rows match their own event; group headers match the group's
    /// lead event; collapsed subgroup rows match any member.
    pub fn matches_event(&self, id: crate::model::EventId) -> bool {
        match self {
            FlattenedRow::Event { event, .. } => event.identifier == id,
            FlattenedRow::GroupHeader { group, .. } => group.lead_event == Some(id),
            FlattenedRow::SwapRow { events, .. }
            | FlattenedRow::MatchedMovementRow { events, .. } => {
                events.iter().any(|e| e.identifier == id)
            }
            _ => false,
        }
    }
}

// ===== Heights =====

/// Responsive layout the list renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Wide, table-like rows.
    Tabular,
    /// Narrow stacked cards (taller rows).
    Card,
}

/// Row heights in pixels for the tabular layout, indexed by [`RowTag`].
pub const TABULAR_ROW_HEIGHTS: RowHeights = RowHeights {
    group_header: 48.0,
    event: 56.0,
    swap_row: 56.0,
    swap_collapse: 32.0,
    matched_movement_row: 56.0,
    matched_movement_collapse: 32.0,
    event_placeholder: 56.0,
    load_more: 36.0,
};

/// Row heights in pixels for the stacked-card layout.
pub const CARD_ROW_HEIGHTS: RowHeights = RowHeights {
    group_header: 64.0,
    event: 112.0,
    swap_row: 112.0,
    swap_collapse: 40.0,
    matched_movement_row: 112.0,
    matched_movement_collapse: 40.0,
    event_placeholder: 112.0,
    load_more: 44.0,
};

/// Fixed per-tag height table.
#[derive(Debug, Clone, Copy)]
pub struct RowHeights {
    pub group_header: f32,
    pub event: f32,
    pub swap_row: f32,
    pub swap_collapse: f32,
    pub matched_movement_row: f32,
    pub matched_movement_collapse: f32,
    pub event_placeholder: f32,
    pub load_more: f32,
}

impl RowHeights {
    /// Height for a row tag.
    pub fn for_tag(&self, tag: RowTag) -> f32 {
        match tag {
            RowTag::GroupHeader => self.group_header,
            RowTag::Event => self.event,
            RowTag::SwapRow => self.swap_row,
            RowTag::SwapCollapse => self.swap_collapse,
            RowTag::MatchedMovementRow => self.matched_movement_row,
            RowTag::MatchedMovementCollapse => self.matched_movement_collapse,
            RowTag::EventPlaceholder => self.event_placeholder,
            RowTag::LoadMore => self.load_more,
        }
    }
}

/// Height table for a layout mode.
pub fn heights_for(layout: LayoutMode) -> &'static RowHeights {
    match layout {
        LayoutMode::Tabular => &TABULAR_ROW_HEIGHTS,
        LayoutMode::Card => &CARD_ROW_HEIGHTS,
    }
}

/// O(1) height lookup for the row at `index`.
///
/// An out-of-range index falls back to the plain event height; the renderer
/// may probe one row past the end while a recompute is in flight, and that
/// must never panic.
pub fn row_height(rows: &[FlattenedRow], index: usize, layout: LayoutMode) -> f32 {
    let table = heights_for(layout);
    match rows.get(index) {
        Some(row) => table.for_tag(row.tag()),
        None => table.event,
    }
}

// ===== Flattening =====

/// Flattens the displayed mapping into the ordered row sequence.
///
/// Per group, in display order: one header; each entry up to the group's
/// visible count (collapsed subgroups as one combined row, expanded ones as
/// a collapse header plus member rows); placeholder rows while the advertised
/// event count exceeds what was fetched; and one load-more row when entries
/// remain beyond the visible count. Groups in `force_expanded` render their
/// subgroups expanded regardless of stored state, so a partially filtered
/// pair is never shown collapsed.
///
/// `fetched_counts` holds the raw per-group event count of the last applied
/// fetch, before hiding or filtering. The placeholder shortfall is measured
/// against it: events removed from view are still fetched, so nothing is
/// left to reserve space for.
pub fn flatten_groups(
    groups: &[Group],
    displayed: &crate::model::EventMapping,
    list_state: &ListState,
    force_expanded: &HashSet<GroupKey>,
    fetched_counts: &HashMap<GroupKey, usize>,
) -> Vec<FlattenedRow> {
    let mut rows = Vec::new();
    const EMPTY: &[GroupEntry] = &[];

    for group in groups {
        rows.push(FlattenedRow::GroupHeader {
            key: group.key.clone(),
            group: group.clone(),
        });

        let entries = displayed
            .get(&group.key)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY);
        let total = entries.len();
        let visible = list_state.visible_count(&group.key).min(total);
        let force = force_expanded.contains(&group.key);

        for (index, entry) in entries.iter().take(visible).enumerate() {
            flatten_entry(&mut rows, &group.key, index, entry, list_state, force);
        }

        // Reserve space for events still streaming in. Subgroups compress
        // several events into one entry and hiding/filtering removes some
        // outright, so the shortfall is measured against the raw fetched
        // event count, never the displayed entries.
        let fetched = fetched_counts.get(&group.key).copied().unwrap_or(0);
        if group.event_count > fetched {
            let missing = (group.event_count - fetched).min(INITIAL_PLACEHOLDER_CAP);
            for index in 0..missing {
                rows.push(FlattenedRow::EventPlaceholder {
                    key: format!("{}-placeholder-{}", group.key, index),
                });
            }
        }

        if total > visible {
            rows.push(FlattenedRow::LoadMore {
                key: group.key.clone(),
                hidden_count: total - visible,
                total_count: total,
            });
        }
    }

    rows
}

fn flatten_entry(
    rows: &mut Vec<FlattenedRow>,
    group_key: &str,
    index: usize,
    entry: &GroupEntry,
    list_state: &ListState,
    force_expanded: bool,
) {
    let subgroup_key = format!("{group_key}-{index}");
    match entry {
        GroupEntry::Single(event) => rows.push(FlattenedRow::Event {
            key: format!("event-{}", event.identifier),
            event: event.clone(),
        }),
        GroupEntry::Swap(events) => {
            let expanded = force_expanded || list_state.is_swap_expanded(&subgroup_key);
            if expanded {
                rows.push(FlattenedRow::SwapCollapse {
                    key: subgroup_key,
                });
                push_member_rows(rows, events);
            } else {
                rows.push(FlattenedRow::SwapRow {
                    key: subgroup_key,
                    events: events.clone(),
                });
            }
        }
        GroupEntry::MatchedMovement(events) => {
            let expanded = force_expanded || list_state.is_movement_expanded(&subgroup_key);
            if expanded {
                rows.push(FlattenedRow::MatchedMovementCollapse {
                    key: subgroup_key,
                });
                push_member_rows(rows, events);
            } else {
                rows.push(FlattenedRow::MatchedMovementRow {
                    key: subgroup_key,
                    events: events.clone(),
                });
            }
        }
    }
}

fn push_member_rows(rows: &mut Vec<FlattenedRow>, events: &[HistoryEvent]) {
    for event in events {
        rows.push(FlattenedRow::Event {
            key: format!("event-{}", event.identifier),
            event: event.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grouping::build_complete_mapping;
    use crate::model::{EventKind, EventMapping};

    fn event(id: u64, group: &str, kind: EventKind) -> HistoryEvent {
        HistoryEvent {
            identifier: id,
            group_key: group.to_string(),
            asset: "ETH".to_string(),
            kind,
            hidden: false,
            timestamp: id as i64,
            label: "event".to_string(),
            amount: 1.0,
        }
    }

    fn group(key: &str, event_count: usize) -> Group {
        Group {
            key: key.to_string(),
            event_count,
            timestamp: 0,
            label: key.to_string(),
            lead_event: None,
        }
    }

    fn mapping_of(events: Vec<HistoryEvent>) -> EventMapping {
        build_complete_mapping(&events)
    }

    fn fetched(key: &str, count: usize) -> HashMap<GroupKey, usize> {
        [(key.to_string(), count)].into()
    }

    fn tags(rows: &[FlattenedRow]) -> Vec<RowTag> {
        rows.iter().map(FlattenedRow::tag).collect()
    }

    #[test]
    fn test_header_then_events_for_plain_group() {
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::Standard),
            event(2, "g1", EventKind::Standard),
        ]);
        let rows = flatten_groups(
            &[group("g1", 2)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 2),
        );
        assert_eq!(
            tags(&rows),
            vec![RowTag::GroupHeader, RowTag::Event, RowTag::Event]
        );
    }

    #[test]
    fn test_collapsed_swap_renders_one_row_keyed_by_position() {
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::Standard),
            event(2, "g1", EventKind::TradeLeg),
            event(3, "g1", EventKind::TradeLeg),
        ]);
        let rows = flatten_groups(
            &[group("g1", 3)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 3),
        );
        assert_eq!(
            tags(&rows),
            vec![RowTag::GroupHeader, RowTag::Event, RowTag::SwapRow]
        );
        assert_eq!(rows[2].row_key(), "g1-1");
    }

    #[test]
    fn test_expanded_swap_renders_collapse_header_plus_members() {
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::TradeLeg),
            event(2, "g1", EventKind::TradeLeg),
        ]);
        let mut state = ListState::new();
        state.toggle_swap_expanded("g1-0");

        let rows = flatten_groups(
            &[group("g1", 2)],
            &displayed,
            &state,
            &HashSet::new(),
            &fetched("g1", 2),
        );
        assert_eq!(
            tags(&rows),
            vec![
                RowTag::GroupHeader,
                RowTag::SwapCollapse,
                RowTag::Event,
                RowTag::Event
            ]
        );
    }

    #[test]
    fn test_toggle_twice_restores_row_composition() {
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::TradeLeg),
            event(2, "g1", EventKind::TradeLeg),
        ]);
        let groups = [group("g1", 2)];
        let counts = fetched("g1", 2);
        let mut state = ListState::new();

        let before = flatten_groups(&groups, &displayed, &state, &HashSet::new(), &counts);
        state.toggle_swap_expanded("g1-0");
        let expanded = flatten_groups(&groups, &displayed, &state, &HashSet::new(), &counts);
        state.toggle_swap_expanded("g1-0");
        let after = flatten_groups(&groups, &displayed, &state, &HashSet::new(), &counts);

        assert_ne!(tags(&before), tags(&expanded));
        assert_eq!(before, after);
    }

    #[test]
    fn test_force_expanded_overrides_collapsed_state() {
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::TradeLeg),
            event(2, "g1", EventKind::TradeLeg),
        ]);
        let mut force = HashSet::new();
        force.insert("g1".to_string());

        let rows = flatten_groups(
            &[group("g1", 2)],
            &displayed,
            &ListState::new(),
            &force,
            &fetched("g1", 2),
        );
        assert_eq!(
            tags(&rows),
            vec![
                RowTag::GroupHeader,
                RowTag::SwapCollapse,
                RowTag::Event,
                RowTag::Event
            ]
        );
    }

    #[test]
    fn test_placeholders_capped_at_initial_limit() {
        // Group advertises 20 events, nothing fetched or displayed yet.
        let displayed = EventMapping::new();
        let rows = flatten_groups(
            &[group("g1", 20)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &HashMap::new(),
        );

        let placeholders = rows
            .iter()
            .filter(|r| r.tag() == RowTag::EventPlaceholder)
            .count();
        assert_eq!(placeholders, INITIAL_PLACEHOLDER_CAP);
    }

    #[test]
    fn test_no_placeholders_once_fetch_covers_advertised_count() {
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::Standard),
            event(2, "g1", EventKind::Standard),
        ]);
        let rows = flatten_groups(
            &[group("g1", 2)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 2),
        );
        assert!(rows.iter().all(|r| r.tag() != RowTag::EventPlaceholder));
    }

    #[test]
    fn test_subgroup_compression_leaves_no_placeholders() {
        // Three advertised events arrive as two entries (approve plus a
        // two-leg swap); the shortfall is zero measured in events.
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::Standard),
            event(2, "g1", EventKind::TradeLeg),
            event(3, "g1", EventKind::TradeLeg),
        ]);
        let rows = flatten_groups(
            &[group("g1", 3)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 3),
        );
        assert_eq!(
            tags(&rows),
            vec![RowTag::GroupHeader, RowTag::Event, RowTag::SwapRow]
        );
        // A genuinely short fetch still reserves the difference.
        let rows = flatten_groups(
            &[group("g1", 5)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 3),
        );
        let placeholders = rows
            .iter()
            .filter(|r| r.tag() == RowTag::EventPlaceholder)
            .count();
        assert_eq!(placeholders, 2);
    }

    #[test]
    fn test_load_more_row_reports_hidden_and_total() {
        let displayed = mapping_of((1..=10).map(|i| event(i, "g1", EventKind::Standard)).collect());
        let groups = [group("g1", 10)];
        let counts = fetched("g1", 10);
        let mut state = ListState::new();

        let rows = flatten_groups(&groups, &displayed, &state, &HashSet::new(), &counts);
        let load_more: Vec<&FlattenedRow> = rows
            .iter()
            .filter(|r| r.tag() == RowTag::LoadMore)
            .collect();
        assert_eq!(load_more.len(), 1);
        match load_more[0] {
            FlattenedRow::LoadMore {
                hidden_count,
                total_count,
                ..
            } => {
                assert_eq!(*hidden_count, 4);
                assert_eq!(*total_count, 10);
            }
            _ => unreachable!(),
        }

        // One load-more raises the visible count to the full ten entries
        // and removes the row.
        state.load_more("g1", 10);
        let rows = flatten_groups(&groups, &displayed, &state, &HashSet::new(), &counts);
        assert!(rows.iter().all(|r| r.tag() != RowTag::LoadMore));
        let events = rows.iter().filter(|r| r.tag() == RowTag::Event).count();
        assert_eq!(events, 10);
    }

    #[test]
    fn test_group_without_displayed_entries_still_gets_header() {
        let displayed = EventMapping::new();
        let rows = flatten_groups(
            &[group("g1", 0)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &HashMap::new(),
        );
        assert_eq!(tags(&rows), vec![RowTag::GroupHeader]);
    }

    #[test]
    fn test_row_height_lookup_and_out_of_range_fallback() {
        let displayed = mapping_of(vec![event(1, "g1", EventKind::Standard)]);
        let rows = flatten_groups(
            &[group("g1", 1)],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 1),
        );

        assert_eq!(
            row_height(&rows, 0, LayoutMode::Tabular),
            TABULAR_ROW_HEIGHTS.group_header
        );
        assert_eq!(
            row_height(&rows, 1, LayoutMode::Card),
            CARD_ROW_HEIGHTS.event
        );
        // Past the end: event-row fallback, no panic.
        assert_eq!(
            row_height(&rows, 999, LayoutMode::Tabular),
            TABULAR_ROW_HEIGHTS.event
        );
    }

    #[test]
    fn test_matches_event_on_rows() {
        let mut g = group("g1", 3);
        g.lead_event = Some(1);
        let displayed = mapping_of(vec![
            event(1, "g1", EventKind::Standard),
            event(2, "g1", EventKind::TradeLeg),
            event(3, "g1", EventKind::TradeLeg),
        ]);
        let rows = flatten_groups(
            &[g],
            &displayed,
            &ListState::new(),
            &HashSet::new(),
            &fetched("g1", 3),
        );

        assert!(rows[0].matches_event(1)); // header via lead event
        assert!(rows[1].matches_event(1)); // plain event row
        assert!(rows[2].matches_event(3)); // collapsed swap member
        assert!(!rows[2].matches_event(1));
    }
}

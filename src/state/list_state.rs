//! Per-group list UI state.
//!
//! This module encapsulates the state the row flattening engine owns:
//! how many entries of each group are visible, and which subgroups are
//! expanded. Nothing outside this struct may mutate either; consumers go
//! through the load-more and toggle operations only.

use crate::model::GroupKey;
use std::collections::{HashMap, HashSet};

/// Entries shown per group before the user asks for more.
pub const DEFAULT_VISIBLE_ROWS: usize = 6;

/// Entries added per "load more" request.
pub const LOAD_MORE_STEP: usize = 6;

/// State related to per-group row visibility and subgroup expansion.
///
/// Responsibilities:
/// - Tracking the visible entry count per group
/// - Tracking which swap / matched-movement subgroups are expanded
/// - Clamping load-more growth to each group's true entry count
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Visible entry count per group; absent means the default.
    visible_counts: HashMap<GroupKey, usize>,
    /// Expanded swap subgroups, keyed `{groupKey}-{entryIndex}`.
    expanded_swaps: HashSet<String>,
    /// Expanded matched-movement subgroups, same key scheme.
    expanded_movements: HashSet<String>,
}

impl ListState {
    /// Creates a new list state with defaults everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all visibility and expansion state.
    pub fn clear(&mut self) {
        self.visible_counts.clear();
        self.expanded_swaps.clear();
        self.expanded_movements.clear();
    }

    // ===== Queries =====

    /// Visible entry count for a group (before clamping to its length).
    pub fn visible_count(&self, key: &str) -> usize {
        self.visible_counts
            .get(key)
            .copied()
            .unwrap_or(DEFAULT_VISIBLE_ROWS)
    }

    /// Whether the swap subgroup with this key is expanded.
    pub fn is_swap_expanded(&self, subgroup_key: &str) -> bool {
        self.expanded_swaps.contains(subgroup_key)
    }

    /// Whether the matched-movement subgroup with this key is expanded.
    pub fn is_movement_expanded(&self, subgroup_key: &str) -> bool {
        self.expanded_movements.contains(subgroup_key)
    }

    // ===== Mutations =====

    /// Grows a group's visible count by one step, clamped to `total`.
    ///
    /// The count never decreases: repeated calls are monotonically
    /// non-decreasing and saturate at the group's true entry count.
    pub fn load_more(&mut self, key: &str, total: usize) {
        let current = self.visible_count(key);
        let next = current.saturating_add(LOAD_MORE_STEP).min(total);
        if next > current {
            self.visible_counts.insert(key.to_string(), next);
        }
    }

    /// Flips the expanded flag of a swap subgroup.
    pub fn toggle_swap_expanded(&mut self, subgroup_key: &str) {
        if !self.expanded_swaps.remove(subgroup_key) {
            self.expanded_swaps.insert(subgroup_key.to_string());
        }
    }

    /// Flips the expanded flag of a matched-movement subgroup.
    pub fn toggle_movement_expanded(&mut self, subgroup_key: &str) {
        if !self.expanded_movements.remove(subgroup_key) {
            self.expanded_movements.insert(subgroup_key.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_visible_count() {
        let state = ListState::new();
        assert_eq!(state.visible_count("g1"), DEFAULT_VISIBLE_ROWS);
    }

    #[test]
    fn test_load_more_grows_by_step_and_clamps() {
        let mut state = ListState::new();
        state.load_more("g1", 10);
        assert_eq!(state.visible_count("g1"), 10);

        // Saturated: another call stays at the total.
        state.load_more("g1", 10);
        assert_eq!(state.visible_count("g1"), 10);

        let mut big = ListState::new();
        big.load_more("g2", 20);
        assert_eq!(big.visible_count("g2"), 12);
        big.load_more("g2", 20);
        assert_eq!(big.visible_count("g2"), 18);
        big.load_more("g2", 20);
        assert_eq!(big.visible_count("g2"), 20);
    }

    #[test]
    fn test_load_more_is_monotonic() {
        let mut state = ListState::new();
        let mut previous = 0;
        for _ in 0..6 {
            state.load_more("g1", 17);
            let current = state.visible_count("g1");
            assert!(current >= previous);
            assert!(current <= 17);
            previous = current;
        }
        assert_eq!(previous, 17);
    }

    #[test]
    fn test_toggle_expansion_round_trips() {
        let mut state = ListState::new();
        assert!(!state.is_swap_expanded("g1-0"));
        state.toggle_swap_expanded("g1-0");
        assert!(state.is_swap_expanded("g1-0"));
        state.toggle_swap_expanded("g1-0");
        assert!(!state.is_swap_expanded("g1-0"));

        state.toggle_movement_expanded("g2-1");
        assert!(state.is_movement_expanded("g2-1"));
        assert!(!state.is_swap_expanded("g2-1"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = ListState::new();
        state.load_more("g1", 30);
        state.toggle_swap_expanded("g1-2");
        state.clear();
        assert_eq!(state.visible_count("g1"), DEFAULT_VISIBLE_ROWS);
        assert!(!state.is_swap_expanded("g1-2"));
    }
}

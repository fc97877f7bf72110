//! Group listing state: current page, totals, filters.

use crate::model::{AssetId, FilterParams, Group, GroupKey, GroupPage};
use std::collections::HashSet;

/// Default number of groups per page.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// State related to the paginated group listing.
///
/// Responsibilities:
/// - Tracking the current page index and the last applied page of groups
/// - Holding the shared filter parameters
/// - Holding the ignore-asset toggle and the ignored asset set
#[derive(Debug, Clone)]
pub struct GroupListState {
    /// Zero-based page index.
    page: usize,
    limit: usize,
    groups: Vec<Group>,
    /// Total group count without filters.
    total: usize,
    /// Group count matching the active filters.
    found: usize,
    filter: FilterParams,
    /// Whether ignored assets are filtered out of the displayed view.
    ignore_filter: bool,
    ignored_assets: HashSet<AssetId>,
}

impl GroupListState {
    /// Creates an empty listing on the first page.
    pub fn new() -> Self {
        Self {
            page: 0,
            limit: DEFAULT_PAGE_LIMIT,
            groups: Vec::new(),
            total: 0,
            found: 0,
            filter: FilterParams::default(),
            ignore_filter: false,
            ignored_assets: HashSet::new(),
        }
    }

    // ===== Queries =====

    /// Zero-based current page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size requested from the provider.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Groups of the last applied page, in display order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Keys of the currently visible groups, in display order.
    pub fn visible_keys(&self) -> Vec<GroupKey> {
        self.groups.iter().map(|g| g.key.clone()).collect()
    }

    /// Total group count without filters.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Group count matching the active filters.
    pub fn found(&self) -> usize {
        self.found
    }

    /// Number of pages for the current filter result.
    pub fn page_count(&self) -> usize {
        if self.limit == 0 {
            return 1;
        }
        self.found.div_ceil(self.limit).max(1)
    }

    /// Active filter parameters.
    pub fn filter(&self) -> &FilterParams {
        &self.filter
    }

    /// Whether the ignore-asset filter is active.
    pub fn ignore_filter_enabled(&self) -> bool {
        self.ignore_filter
    }

    /// The set of ignored asset identifiers.
    pub fn ignored_assets(&self) -> &HashSet<AssetId> {
        &self.ignored_assets
    }

    // ===== Mutations =====

    /// Switches to a page.
    ///
    /// # Returns
    /// `true` if the page actually changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let changed = page != self.page;
        self.page = page;
        changed
    }

    /// Changes the page size and returns to the first page when it differs.
    pub fn set_limit(&mut self, limit: usize) {
        if limit > 0 && limit != self.limit {
            self.limit = limit;
            self.page = 0;
        }
    }

    /// Replaces the filter parameters and returns to the first page when
    /// they differ.
    ///
    /// # Returns
    /// `true` if the parameters changed.
    pub fn set_filter(&mut self, filter: FilterParams) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.page = 0;
        true
    }

    /// Toggles the ignore-asset filter.
    ///
    /// # Returns
    /// `true` if the flag changed.
    pub fn set_ignore_filter(&mut self, enabled: bool) -> bool {
        let changed = enabled != self.ignore_filter;
        self.ignore_filter = enabled;
        changed
    }

    /// Replaces the ignored asset set.
    pub fn set_ignored_assets(&mut self, assets: HashSet<AssetId>) {
        self.ignored_assets = assets;
    }

    /// Applies a fetched page of groups.
    ///
    /// The page index is not touched here; out-of-range clamping is the
    /// coordinator's decision because it triggers a refetch.
    pub fn apply_page(&mut self, page: GroupPage) {
        self.groups = page.groups;
        self.total = page.total;
        self.found = page.found;
        if page.limit > 0 {
            self.limit = page.limit;
        }
    }

    /// Clears the listing, keeping filters and pagination settings.
    pub fn clear_groups(&mut self) {
        self.groups.clear();
        self.total = 0;
        self.found = 0;
    }
}

impl Default for GroupListState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(keys: &[&str], found: usize, limit: usize) -> GroupPage {
        GroupPage {
            groups: keys
                .iter()
                .map(|k| Group {
                    key: k.to_string(),
                    event_count: 0,
                    timestamp: 0,
                    label: String::new(),
                    lead_event: None,
                })
                .collect(),
            total: found,
            found,
            limit,
        }
    }

    #[test]
    fn test_apply_page_updates_listing_and_counts() {
        let mut state = GroupListState::new();
        state.apply_page(page_of(&["g1", "g2"], 25, 10));

        assert_eq!(state.visible_keys(), vec!["g1", "g2"]);
        assert_eq!(state.found(), 25);
        assert_eq!(state.page_count(), 3);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = GroupListState::new();
        state.set_page(4);

        assert!(!state.set_filter(FilterParams::default()));
        assert_eq!(state.page(), 4);

        let filter = FilterParams {
            asset: Some("ETH".to_string()),
            ..FilterParams::default()
        };
        assert!(state.set_filter(filter));
        assert_eq!(state.page(), 0);
    }

    #[test]
    fn test_empty_listing_still_reports_one_page() {
        let state = GroupListState::new();
        assert_eq!(state.page_count(), 1);
    }
}

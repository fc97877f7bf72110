//! Caching of derived view values.

use crate::domain::flatten::{FlattenedRow, LayoutMode};
use crate::domain::resolver::CompleteEventResolver;
use crate::model::EventMapping;
use crate::ui::row_window::RowWindow;

/// Cache for expensive derived values of the history view.
///
/// Stores the flattened row sequence, the per-layout offset table built from
/// it, and the reverse-index resolver, so they are recomputed only when their
/// inputs change. Rows are invalidated on any event-mapping, visible-count,
/// or expand-state change; the resolver is keyed by the event revision
/// counter.
pub struct ViewCache {
    rows: Option<Vec<FlattenedRow>>,
    window: RowWindow,
    /// Layout the cached window was built for; `None` when rows changed.
    window_layout: Option<LayoutMode>,
    resolver: CompleteEventResolver,
    /// Event revision the cached resolver was built from.
    resolver_revision: Option<u64>,
}

impl ViewCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            rows: None,
            window: RowWindow::default(),
            window_layout: None,
            resolver: CompleteEventResolver::default(),
            resolver_revision: None,
        }
    }

    /// Invalidates all cached data.
    pub fn invalidate(&mut self) {
        self.invalidate_rows();
        self.resolver_revision = None;
    }

    /// Invalidates the flattened rows and the window built from them.
    ///
    /// Call whenever the displayed mapping, a visible count, an expand
    /// state, or the group page changes. The resolver survives; it depends
    /// only on the complete mapping.
    pub fn invalidate_rows(&mut self) {
        self.rows = None;
        self.window_layout = None;
    }

    /// Cached flattened rows, if still valid.
    pub fn rows(&self) -> Option<&[FlattenedRow]> {
        self.rows.as_deref()
    }

    /// Stores freshly flattened rows. The window is rebuilt lazily.
    pub fn set_rows(&mut self, rows: Vec<FlattenedRow>) {
        self.rows = Some(rows);
        self.window_layout = None;
    }

    /// Offset window over the cached rows for `layout`, rebuilding it when
    /// the rows or the layout changed. `None` until rows are stored.
    pub fn window_for(&mut self, layout: LayoutMode) -> Option<&mut RowWindow> {
        let rows = self.rows.as_deref()?;
        if self.window_layout != Some(layout) {
            self.window = RowWindow::new(rows, layout);
            self.window_layout = Some(layout);
        }
        Some(&mut self.window)
    }

    /// Resolver for the given event revision, rebuilding on revision change.
    pub fn resolver_for(
        &mut self,
        revision: u64,
        complete: &EventMapping,
    ) -> &CompleteEventResolver {
        if self.resolver_revision != Some(revision) {
            self.resolver = CompleteEventResolver::build(complete);
            self.resolver_revision = Some(revision);
        }
        &self.resolver
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Group;

    fn header(key: &str) -> FlattenedRow {
        FlattenedRow::GroupHeader {
            key: key.to_string(),
            group: Group {
                key: key.to_string(),
                event_count: 0,
                timestamp: 0,
                label: String::new(),
                lead_event: None,
            },
        }
    }

    #[test]
    fn test_rows_start_invalid_and_survive_until_invalidated() {
        let mut cache = ViewCache::new();
        assert!(cache.rows().is_none());
        assert!(cache.window_for(LayoutMode::Tabular).is_none());

        cache.set_rows(vec![header("g1")]);
        assert_eq!(cache.rows().map(<[_]>::len), Some(1));

        cache.invalidate_rows();
        assert!(cache.rows().is_none());
    }

    #[test]
    fn test_window_rebuilds_on_layout_change() {
        let mut cache = ViewCache::new();
        cache.set_rows(vec![header("g1"), header("g2")]);

        let tabular_height = cache
            .window_for(LayoutMode::Tabular)
            .map(|w| w.total_height())
            .unwrap();
        let card_height = cache
            .window_for(LayoutMode::Card)
            .map(|w| w.total_height())
            .unwrap();
        assert!(card_height > tabular_height);
    }

    #[test]
    fn test_resolver_keyed_by_revision() {
        let mut cache = ViewCache::new();
        let complete = EventMapping::new();

        cache.resolver_for(1, &complete);
        assert_eq!(cache.resolver_revision, Some(1));
        cache.resolver_for(1, &complete);
        assert_eq!(cache.resolver_revision, Some(1));
        cache.resolver_for(2, &complete);
        assert_eq!(cache.resolver_revision, Some(2));
    }
}

//! Viewport windowing over the flattened row sequence.
//!
//! Rows have per-tag heights, so the mapping between scroll offset and row
//! index goes through a prefix-sum offset table. The window handed to the
//! renderer is the contiguous index range intersecting the viewport, padded
//! by a fixed overscan on each side to mask pop-in while scrolling.

use crate::domain::flatten::{heights_for, FlattenedRow, LayoutMode};
use std::ops::Range;

/// Extra rows materialized beyond the viewport on each side.
pub const OVERSCAN_ROWS: usize = 15;

/// Prefix-sum offset table over the flattened rows for one layout.
///
/// `offsets[i]` is the pixel position of row `i`'s top edge; the final entry
/// is the total content height. Rebuilt whenever the rows or the layout
/// change, cheap to query afterwards.
#[derive(Debug, Clone, Default)]
pub struct RowWindow {
    offsets: Vec<f32>,
    /// Index range handed out by the last `visible_range` call.
    rendered: Option<Range<usize>>,
}

impl RowWindow {
    /// Builds the offset table for `rows` under `layout`.
    pub fn new(rows: &[FlattenedRow], layout: LayoutMode) -> Self {
        let table = heights_for(layout);
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut y = 0.0;
        offsets.push(y);
        for row in rows {
            y += table.for_tag(row.tag());
            offsets.push(y);
        }
        Self {
            offsets,
            rendered: None,
        }
    }

    // ===== Queries =====

    /// Number of rows covered by the table.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Whether the table covers no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total content height in pixels.
    pub fn total_height(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Pixel position of a row's top edge, the scroll target for revealing
    /// it. Indices past the end clamp to the total height.
    pub fn offset_of(&self, index: usize) -> f32 {
        let clamped = index.min(self.len());
        self.offsets.get(clamped).copied().unwrap_or(0.0)
    }

    /// Index of the row containing the vertical position `y`.
    pub fn index_at(&self, y: f32) -> usize {
        if self.is_empty() {
            return 0;
        }
        let after = self.offsets.partition_point(|&top| top <= y);
        after.saturating_sub(1).min(self.len() - 1)
    }

    /// Index range handed out by the last `visible_range` call, if any.
    pub fn rendered_range(&self) -> Option<&Range<usize>> {
        self.rendered.as_ref()
    }

    // ===== Windowing =====

    /// Computes the row range to materialize for the current scroll position,
    /// padded by [`OVERSCAN_ROWS`] on each side, and records it.
    pub fn visible_range(&mut self, scroll_offset: f32, viewport_height: f32) -> Range<usize> {
        if self.is_empty() {
            self.rendered = Some(0..0);
            return 0..0;
        }
        let first = self.index_at(scroll_offset.max(0.0));
        let last = self.index_at(scroll_offset.max(0.0) + viewport_height.max(0.0));

        let start = first.saturating_sub(OVERSCAN_ROWS);
        let end = (last + 1 + OVERSCAN_ROWS).min(self.len());

        self.rendered = Some(start..end);
        start..end
    }

    /// Height of the skipped rows above `range`, for the scroll host's top
    /// spacer.
    pub fn top_padding(&self, range: &Range<usize>) -> f32 {
        self.offset_of(range.start)
    }

    /// Height of the skipped rows below `range`, for the bottom spacer.
    pub fn bottom_padding(&self, range: &Range<usize>) -> f32 {
        (self.total_height() - self.offset_of(range.end)).max(0.0)
    }
}

//! One-shot scroll planning for highlighted events.
//!
//! When a set of event identities must be revealed (deep link, "show these
//! events" action), the planner maps them to flattened row indices and
//! decides a single scroll target. The decision depends on how many of the
//! identities are currently locatable, so the caller keeps re-planning as
//! rows stream in until a decision is reached or the wait bound expires.

use crate::domain::flatten::{FlattenedRow, LayoutMode};
use crate::model::EventId;
use crate::ui::row_window::OVERSCAN_ROWS;
use std::ops::Range;

/// Two matches count as adjacent when at most this many rows sit between
/// them, per layout.
pub const HIGHLIGHT_NEAR_ROWS_TABULAR: usize = 3;
pub const HIGHLIGHT_NEAR_ROWS_CARD: usize = 1;

/// Context rows kept above a single highlighted card when scrolling to it.
pub const CARD_CONTEXT_ROWS: usize = 1;

/// Estimated rows a viewport holds, used to place the second of two distant
/// matches near the bottom.
pub const VIEWPORT_BOTTOM_ROWS_TABULAR: usize = 8;
pub const VIEWPORT_BOTTOM_ROWS_CARD: usize = 4;

/// Outcome of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollPlan {
    /// No highlighted identity is locatable yet; keep watching.
    Pending,
    /// A decision was reached and the current position is fine.
    Stay,
    /// Scroll so the row at this index is revealed.
    ToRow(usize),
}

/// Maps highlighted identities to flattened row indices, in highlight-list
/// order. Identities without a matching row are skipped; collapsed subgroup
/// rows match any of their members.
pub fn locate_highlight_indices(rows: &[FlattenedRow], ids: &[EventId]) -> Vec<usize> {
    ids.iter()
        .filter_map(|&id| rows.iter().position(|row| row.matches_event(id)))
        .collect()
}

/// Plans the one-shot scroll for the located highlight indices.
///
/// `rendered` is the row range the renderer last materialized, used by the
/// three-or-more rule to decide whether the last match is already on screen.
///
/// # Arguments
/// * `indices` - Located row indices, in highlight-list order
/// * `layout` - Current responsive layout
/// * `rendered` - Last materialized row range, if any frame rendered yet
pub fn plan_scroll(
    indices: &[usize],
    layout: LayoutMode,
    rendered: Option<&Range<usize>>,
) -> ScrollPlan {
    match indices {
        [] => ScrollPlan::Pending,
        [only] => ScrollPlan::ToRow(context_adjusted(*only, layout)),
        [first, second] => plan_pair(*first, *second, layout),
        [.., last] => plan_many(*last, rendered),
    }
}

fn context_adjusted(index: usize, layout: LayoutMode) -> usize {
    match layout {
        LayoutMode::Tabular => index,
        LayoutMode::Card => index.saturating_sub(CARD_CONTEXT_ROWS),
    }
}

/// Two matches: show both together when they are close; otherwise favor the
/// second, positioned so the pair reads in order when possible.
fn plan_pair(first: usize, second: usize, layout: LayoutMode) -> ScrollPlan {
    let near = match layout {
        LayoutMode::Tabular => HIGHLIGHT_NEAR_ROWS_TABULAR,
        LayoutMode::Card => HIGHLIGHT_NEAR_ROWS_CARD,
    };
    let between = first.abs_diff(second).saturating_sub(1);
    if between <= near {
        return ScrollPlan::ToRow(first.min(second));
    }

    if second > first {
        // Far apart, reading downward: land the second near the bottom of
        // an estimated viewport so the first stays in reach above.
        let bottom = match layout {
            LayoutMode::Tabular => VIEWPORT_BOTTOM_ROWS_TABULAR,
            LayoutMode::Card => VIEWPORT_BOTTOM_ROWS_CARD,
        };
        ScrollPlan::ToRow(second.saturating_sub(bottom))
    } else {
        ScrollPlan::ToRow(second)
    }
}

/// Three or more matches: only move if the last match sits outside the
/// rendered band trimmed of its overscan fringe.
fn plan_many(last: usize, rendered: Option<&Range<usize>>) -> ScrollPlan {
    let Some(range) = rendered else {
        return ScrollPlan::ToRow(last);
    };
    let trim = OVERSCAN_ROWS.min(range.len() / 4);
    let start = range.start + trim;
    let end = range.end.saturating_sub(trim);
    if (start..end).contains(&last) {
        ScrollPlan::Stay
    } else {
        ScrollPlan::ToRow(last)
    }
}

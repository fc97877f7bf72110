//! State management modules for the history viewer.
//!
//! This module contains state-only logic (no UI concerns):
//! - Group list state (pagination, filters, ignore toggle)
//! - Event state (complete/displayed mappings, revision)
//! - List state (per-group visible counts, subgroup expansion)
//! - Viewport state (scroll offset, layout breakpoint, pending scroll)
//! - Highlight state (deep-link identifiers, one-shot scroll arming)

mod event_state;
mod group_list;
mod highlight;
mod list_state;
mod viewport;

pub use event_state::EventState;
pub use group_list::{GroupListState, DEFAULT_PAGE_LIMIT};
pub use highlight::{HighlightEntry, HighlightState, HIGHLIGHT_WAIT};
pub use list_state::{ListState, DEFAULT_VISIBLE_ROWS, LOAD_MORE_STEP};
pub use viewport::{ViewportState, CARD_LAYOUT_BREAKPOINT};

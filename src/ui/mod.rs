//! UI subsystem for the history viewer:
//! - Row window (prefix-sum offsets, viewport windowing, overscan)
//! - Highlight navigation (one-shot scroll planning)
//! - History panel (virtualized grouped list rendering)
//! - Status bar (loading, errors, counts, page controls)

pub mod highlight_nav;
pub mod history_panel;
pub mod row_window;
pub mod status_bar;

pub use highlight_nav::{locate_highlight_indices, plan_scroll, ScrollPlan};
pub use history_panel::{render_history_panel, PanelInteraction};
pub use row_window::{RowWindow, OVERSCAN_ROWS};
pub use status_bar::{render_status_bar, StatusBarInteraction};

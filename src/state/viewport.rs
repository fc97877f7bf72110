//! Viewport and scroll state management.
//!
//! This module encapsulates all state related to the visible viewport:
//! vertical scroll position, measured viewport height, the responsive
//! layout breakpoint, and one-shot programmatic scroll targets.

use crate::domain::flatten::LayoutMode;

/// Available width below which the list switches to stacked cards.
pub const CARD_LAYOUT_BREAKPOINT: f32 = 700.0;

/// State related to the visible viewport and scrolling.
///
/// Responsibilities:
/// - Tracking vertical scroll position and viewport height
/// - Deriving the layout mode from the available width
/// - Carrying one-shot scroll requests (highlight jumps, page resets)
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// Current vertical scroll offset in pixels.
    scroll_offset: f32,
    /// Last measured viewport height in pixels.
    viewport_height: f32,
    /// Current responsive layout.
    layout: LayoutMode,
    /// Pending programmatic scroll target, consumed by the scroll host.
    pending_scroll: Option<f32>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Creates a new viewport state at the top, in tabular layout.
    pub fn new() -> Self {
        Self {
            scroll_offset: 0.0,
            viewport_height: 600.0,
            layout: LayoutMode::Tabular,
            pending_scroll: None,
        }
    }

    // ===== Queries =====

    /// Current vertical scroll offset in pixels.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Last measured viewport height in pixels.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Current responsive layout mode.
    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Whether a programmatic scroll is waiting to be applied.
    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll.is_some()
    }

    // ===== Mutations =====

    /// Records the scroll offset observed from the scroll host.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.max(0.0);
    }

    /// Records the measured viewport height.
    pub fn set_viewport_height(&mut self, height: f32) {
        if height > 0.0 {
            self.viewport_height = height;
        }
    }

    /// Updates the layout mode from the available width.
    ///
    /// # Returns
    /// `true` if the layout changed (derived rows need recomputation).
    pub fn update_layout_for_width(&mut self, available_width: f32) -> bool {
        let next = if available_width < CARD_LAYOUT_BREAKPOINT {
            LayoutMode::Card
        } else {
            LayoutMode::Tabular
        };
        let changed = next != self.layout;
        self.layout = next;
        changed
    }

    /// Requests a one-shot programmatic scroll to an absolute offset.
    pub fn request_scroll_to(&mut self, offset: f32) {
        self.pending_scroll = Some(offset.max(0.0));
    }

    /// Requests a one-shot scroll back to the top.
    pub fn request_scroll_to_top(&mut self) {
        self.pending_scroll = Some(0.0);
    }

    /// Takes the pending scroll target, if any. The host applies it once.
    pub fn take_pending_scroll(&mut self) -> Option<f32> {
        self.pending_scroll.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_switches_at_breakpoint() {
        let mut state = ViewportState::new();
        assert_eq!(state.layout(), LayoutMode::Tabular);

        assert!(state.update_layout_for_width(CARD_LAYOUT_BREAKPOINT - 1.0));
        assert_eq!(state.layout(), LayoutMode::Card);

        // Same width again: no change reported.
        assert!(!state.update_layout_for_width(CARD_LAYOUT_BREAKPOINT - 1.0));

        assert!(state.update_layout_for_width(CARD_LAYOUT_BREAKPOINT + 1.0));
        assert_eq!(state.layout(), LayoutMode::Tabular);
    }

    #[test]
    fn test_pending_scroll_is_one_shot() {
        let mut state = ViewportState::new();
        assert!(!state.has_pending_scroll());

        state.request_scroll_to(250.0);
        assert!(state.has_pending_scroll());
        assert_eq!(state.take_pending_scroll(), Some(250.0));
        assert_eq!(state.take_pending_scroll(), None);
    }

    #[test]
    fn test_scroll_offset_never_negative() {
        let mut state = ViewportState::new();
        state.set_scroll_offset(-10.0);
        assert_eq!(state.scroll_offset(), 0.0);
        state.request_scroll_to(-5.0);
        assert_eq!(state.take_pending_scroll(), Some(0.0));
    }
}

//! Highlight state for deep-linked navigation.
//!
//! A deep link (or an in-app "show me these events" action) supplies an
//! ordered list of event identities, optionally tagged with a classification
//! label. The list re-arms a one-shot scroll: the navigation algorithm runs
//! once per highlight change, and while the rows are not loaded yet it keeps
//! waiting, up to an upper bound, as data streams in.

use crate::model::EventId;
use std::time::{Duration, Instant};

/// Upper bound on waiting for highlighted rows to appear.
pub const HIGHLIGHT_WAIT: Duration = Duration::from_secs(5);

/// One highlighted identifier with its optional classification tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightEntry {
    /// Event identity to reveal.
    pub id: EventId,
    /// Optional classification (e.g. "in", "out") for styling.
    pub tag: Option<String>,
}

impl HighlightEntry {
    /// Convenience constructor for an untagged entry.
    pub fn new(id: EventId) -> Self {
        Self { id, tag: None }
    }
}

/// State related to the highlighted identifier set.
///
/// Responsibilities:
/// - Holding the ordered highlight list (order matters for two-match scroll)
/// - Arming exactly one scroll per highlight change
/// - Bounding how long an unresolved highlight keeps the watcher alive
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    entries: Vec<HighlightEntry>,
    /// Set once the scroll decision for the current list has been made.
    scrolled: bool,
    /// Deadline after which an unresolved highlight gives up.
    deadline: Option<Instant>,
}

impl HighlightState {
    /// Creates an empty, disarmed highlight state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the highlight list and re-arms the scroll.
    ///
    /// An identical list does not re-arm; the scroll stays one-shot.
    pub fn set_highlights(&mut self, entries: Vec<HighlightEntry>) {
        if entries == self.entries {
            return;
        }
        self.entries = entries;
        self.scrolled = false;
        self.deadline = if self.entries.is_empty() {
            None
        } else {
            Some(Instant::now() + HIGHLIGHT_WAIT)
        };
    }

    /// Clears the highlight list and disarms the scroll.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scrolled = false;
        self.deadline = None;
    }

    // ===== Queries =====

    /// The highlighted identifiers, in caller order.
    pub fn entries(&self) -> &[HighlightEntry] {
        &self.entries
    }

    /// The highlighted identities, in caller order.
    pub fn ids(&self) -> Vec<EventId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Classification tag for an identity, if one was supplied.
    pub fn tag_for(&self, id: EventId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.tag.as_deref())
    }

    /// Whether a scroll decision is still owed for the current list.
    pub fn scroll_pending(&self) -> bool {
        !self.entries.is_empty() && !self.scrolled && !self.expired()
    }

    /// Whether the wait bound has been exceeded.
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() > d)
    }

    // ===== Mutations =====

    /// Marks the one-shot scroll as done for the current list.
    pub fn mark_scrolled(&mut self) {
        self.scrolled = true;
    }
}

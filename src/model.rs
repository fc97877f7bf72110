//! Core data model for grouped transaction histories.
//!
//! A history is a paginated list of top-level groups (one transaction or
//! exchange action each). Every group owns an ordered list of events, some of
//! which combine into subgroups: swap legs that belong to one trade, or an
//! exchange-side movement matched with its chain-side counterpart.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identity of a top-level history group.
pub type GroupKey = String;

/// Stable identity of a single history event.
pub type EventId = u64;

/// Identifier of the asset an event moves.
pub type AssetId = String;

/// Discriminator for how an event may combine with its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Stands alone; never combined into a subgroup.
    Standard,
    /// Swap leg, eligible to pair with adjacent legs of the same trade.
    TradeLeg,
    /// Cross-domain movement (e.g. exchange withdrawal matched with an
    /// on-chain deposit).
    AssetMovement,
}

impl EventKind {
    /// Whether a run of adjacent events of this kind may form a subgroup.
    pub fn is_groupable(self) -> bool {
        !matches!(self, EventKind::Standard)
    }
}

/// A single record within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Stable event identity.
    pub identifier: EventId,
    /// Key of the group this event belongs to.
    pub group_key: GroupKey,
    /// Asset moved by this event.
    pub asset: AssetId,
    /// How this event combines with siblings.
    pub kind: EventKind,
    /// Set upstream; a hidden event must never be shown regardless of filters.
    #[serde(default)]
    pub hidden: bool,
    /// Event timestamp in milliseconds.
    pub timestamp: i64,
    /// Short human-readable label (e.g. "approve", "spend", "receive").
    pub label: String,
    /// Amount moved, in asset units.
    pub amount: f64,
}

/// One element of a group's event list: a single event or a subgroup of
/// related events rendered and operated on as one unit.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupEntry {
    /// A plain event.
    Single(HistoryEvent),
    /// An ordered run of swap legs belonging to one trade.
    Swap(Vec<HistoryEvent>),
    /// A run containing at least one cross-domain movement event.
    MatchedMovement(Vec<HistoryEvent>),
}

impl GroupEntry {
    /// Returns the events inside this entry, in order.
    pub fn events(&self) -> &[HistoryEvent] {
        match self {
            GroupEntry::Single(event) => std::slice::from_ref(event),
            GroupEntry::Swap(events) | GroupEntry::MatchedMovement(events) => events,
        }
    }

    /// Number of events inside this entry.
    pub fn len(&self) -> usize {
        self.events().len()
    }

    /// True when the entry holds no events (filtered-out subgroup).
    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    /// True for swap and matched-movement entries.
    pub fn is_subgroup(&self) -> bool {
        !matches!(self, GroupEntry::Single(_))
    }
}

/// A top-level, independently paginated unit of the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Stable group key.
    pub key: GroupKey,
    /// Advertised child-event count; may exceed what has been fetched.
    pub event_count: usize,
    /// Group timestamp in milliseconds.
    pub timestamp: i64,
    /// Short human-readable label.
    pub label: String,
    /// Identity of the lead event the group header row is rendered from,
    /// if known. Used to match group headers against highlighted events.
    #[serde(default)]
    pub lead_event: Option<EventId>,
}

/// One page of groups returned by the group provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPage {
    /// Groups on this page, in display order.
    pub groups: Vec<Group>,
    /// Total number of groups without filters.
    pub total: usize,
    /// Number of groups matching the active filters.
    pub found: usize,
    /// Page size the provider applied.
    pub limit: usize,
}

impl GroupPage {
    /// Number of pages available for the current filter result.
    pub fn page_count(&self) -> usize {
        if self.limit == 0 {
            return 1;
        }
        self.found.div_ceil(self.limit).max(1)
    }
}

/// Shared filter and sort parameters for group and event fetches.
///
/// Compared by value so request-change detection can tell whether a new
/// fetch needs to be issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Inclusive start of the time range, if bounded.
    pub from_timestamp: Option<i64>,
    /// Inclusive end of the time range, if bounded.
    pub to_timestamp: Option<i64>,
    /// Restrict to a single asset, if set.
    pub asset: Option<AssetId>,
    /// Sort direction for groups and events.
    pub ascending: bool,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            from_timestamp: None,
            to_timestamp: None,
            asset: None,
            ascending: false,
        }
    }
}

/// Group key to ordered entry list. Used for both the complete and the
/// displayed view of fetched events.
pub type EventMapping = HashMap<GroupKey, Vec<GroupEntry>>;

//! External data-provider boundary.
//!
//! The core never performs network or database access itself. It consumes two
//! provider traits: one for the paginated group listing and one for the child
//! events of a set of groups. Providers are driven from background threads,
//! so implementations must be `Send + Sync` and honor the cancellation token
//! they are handed.

use crate::model::{FilterParams, GroupKey, GroupPage, HistoryEvent};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for one in-flight fetch.
///
/// Issuing a new fetch on the same logical channel cancels the previous one
/// by tripping its token. Providers should check the token at their own
/// suspension points and bail out with [`FetchError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the token. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the fetch guarded by this token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Failure modes of an event fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetch was superseded and its token tripped. Never surfaced.
    Cancelled,
    /// Genuine failure (network, validation). Surfaced to the caller.
    Remote(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Cancelled => write!(f, "fetch cancelled"),
            FetchError::Remote(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Provider of the paginated top-level group listing.
pub trait GroupProvider: Send + Sync {
    /// Fetches one page of groups.
    ///
    /// # Arguments
    /// * `page` - Zero-based page index
    /// * `limit` - Page size
    /// * `params` - Shared filter/sort parameters
    /// * `token` - Cancellation token for this call
    fn fetch_groups(
        &self,
        page: usize,
        limit: usize,
        params: &FilterParams,
        token: &CancelToken,
    ) -> Result<GroupPage, FetchError>;
}

/// Provider of the child events for a set of groups.
pub trait EventProvider: Send + Sync {
    /// Fetches all events belonging to the given groups, in display order.
    ///
    /// The request is scoped to exactly `keys` and must return the unbounded
    /// result set for those groups (no server-side row limit).
    fn fetch_events(
        &self,
        keys: &[GroupKey],
        params: &FilterParams,
        token: &CancelToken,
    ) -> Result<Vec<HistoryEvent>, FetchError>;
}

/// Predicate deciding whether an asset is currently ignored by the user.
pub trait IgnoredAssets {
    /// Whether events for this asset are filtered out of the displayed view.
    fn is_ignored(&self, asset: &str) -> bool;
}

impl IgnoredAssets for std::collections::HashSet<String> {
    fn is_ignored(&self, asset: &str) -> bool {
        self.contains(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cancel_token_trips_once_for_all_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_ignored_assets_set_predicate() {
        let mut ignored = HashSet::new();
        ignored.insert("SPAM".to_string());
        assert!(ignored.is_ignored("SPAM"));
        assert!(!ignored.is_ignored("ETH"));
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Cancelled.to_string(), "fetch cancelled");
        assert_eq!(
            FetchError::Remote("boom".to_string()).to_string(),
            "boom"
        );
    }
}

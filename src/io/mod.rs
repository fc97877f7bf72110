//! I/O modules for background history fetching.
//!
//! Fetches run on background threads and report back through channels; the
//! main thread polls once per frame. Issue order, not completion order,
//! decides which result is applied.

pub mod event_fetcher;
pub mod group_fetcher;

pub use event_fetcher::{EventFetchOutcome, EventFetcher};
pub use group_fetcher::{GroupFetchOutcome, GroupFetcher};

use std::time::{Duration, Instant};

/// Delay before a raw loading condition becomes user-visible.
pub const LOADING_DEBOUNCE: Duration = Duration::from_millis(100);

/// Anti-flicker loading flag.
///
/// The combined loading condition (parent group fetch or event fetch in
/// flight) becomes visible only after it has held continuously for the
/// debounce delay, and clears immediately when loading ends. Fast responses
/// therefore never flash a spinner.
#[derive(Debug, Clone)]
pub struct LoadingDebounce {
    delay: Duration,
    raw_since: Option<Instant>,
}

impl LoadingDebounce {
    /// Creates a debounce with the default delay.
    pub fn new() -> Self {
        Self::with_delay(LOADING_DEBOUNCE)
    }

    /// Creates a debounce with a custom delay (tests use zero).
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            raw_since: None,
        }
    }

    /// Feeds the current raw loading condition.
    pub fn update(&mut self, raw: bool) {
        if raw {
            if self.raw_since.is_none() {
                self.raw_since = Some(Instant::now());
            }
        } else {
            self.raw_since = None;
        }
    }

    /// Whether the loading indicator should be shown.
    pub fn is_visible(&self) -> bool {
        self.raw_since
            .is_some_and(|since| since.elapsed() >= self.delay)
    }

    /// Whether the raw condition currently holds (undebounced).
    pub fn is_raw(&self) -> bool {
        self.raw_since.is_some()
    }
}

impl Default for LoadingDebounce {
    fn default() -> Self {
        Self::new()
    }
}

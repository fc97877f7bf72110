//! Asynchronous child-event fetching.
//!
//! This module orchestrates the fetch of full child-event sets for the
//! currently visible groups, keeping the UI responsive while requests run on
//! a background thread. Requests on this channel supersede each other: a new
//! request cancels the in-flight one, and results are committed only when
//! their generation matches the latest issued generation, so an earlier
//! request can never overwrite a later one's data no matter when it resolves.

use crate::model::{FilterParams, GroupKey, HistoryEvent};
use crate::providers::{CancelToken, EventProvider, FetchError};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Outcome of polling the event fetch channel.
#[derive(Debug)]
pub enum EventFetchOutcome {
    /// The latest-issued fetch completed; apply these events.
    Applied(Vec<HistoryEvent>),
    /// A superseded fetch resolved late; its result was discarded.
    Stale,
    /// The in-flight fetch observed its cancellation token; ignored.
    Cancelled,
    /// Genuine failure; prior state must be preserved by the caller.
    Failed(String),
    /// Nothing to report (still in flight, or idle).
    Pending,
}

/// Orchestrates background event fetches for the visible group set.
///
/// One logical channel: issuing a request cancels the previous one via its
/// token and bumps the issue generation. Results travel back tagged with the
/// generation they were issued under.
pub struct EventFetcher {
    /// Latest issued generation; only matching results are committed.
    generation: u64,
    /// Channel for the in-flight fetch, if any.
    receiver: Option<Receiver<(u64, Result<Vec<HistoryEvent>, FetchError>)>>,
    /// Cancellation token of the in-flight fetch.
    cancel: Option<CancelToken>,
    /// Key set and parameters of the last issued request, for change
    /// detection by the coordinator.
    last_request: Option<(Vec<GroupKey>, FilterParams)>,
}

impl EventFetcher {
    /// Creates a fetcher with no active request.
    pub fn new() -> Self {
        Self {
            generation: 0,
            receiver: None,
            cancel: None,
            last_request: None,
        }
    }

    /// Whether a fetch is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.receiver.is_some()
    }

    /// Whether `keys`/`params` differ from the last issued request.
    pub fn needs_request(&self, keys: &[GroupKey], params: &FilterParams) -> bool {
        match &self.last_request {
            Some((last_keys, last_params)) => last_keys != keys || last_params != params,
            None => true,
        }
    }

    /// Drops all request tracking, so the next sync issues a fresh fetch.
    ///
    /// Cancels anything in flight. Used when the visible group set becomes
    /// empty and accumulated event state is cleared without fetching.
    pub fn reset(&mut self) {
        if let Some(token) = &self.cancel {
            token.cancel();
        }
        self.receiver = None;
        self.cancel = None;
        self.last_request = None;
    }

    /// Issues a fetch scoped to exactly `keys`, superseding any in-flight one.
    ///
    /// The previous fetch's token is tripped first; its late result, if any,
    /// is discarded by generation comparison. `repaint` is cloned into the
    /// background thread to wake the UI when the result arrives (None in
    /// headless use).
    ///
    /// # Arguments
    /// * `provider` - Event provider performing the actual fetch
    /// * `keys` - Visible group keys; the request covers exactly these
    /// * `params` - Shared filter/sort parameters
    /// * `repaint` - Optional egui context for completion repaint
    pub fn request(
        &mut self,
        provider: Arc<dyn EventProvider>,
        keys: Vec<GroupKey>,
        params: FilterParams,
        repaint: Option<egui::Context>,
    ) {
        // Supersede: cancel whatever is still running on this channel.
        if let Some(token) = &self.cancel {
            token.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let token = CancelToken::new();
        self.cancel = Some(token.clone());
        self.last_request = Some((keys.clone(), params.clone()));

        let (sender, receiver) = channel();
        self.receiver = Some(receiver);

        thread::spawn(move || {
            let result = provider.fetch_events(&keys, &params, &token);
            // The receiver may already belong to a newer request; a failed
            // send just means nobody is interested anymore.
            let _ = sender.send((generation, result));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Polls for a completed fetch. Call once per frame.
    ///
    /// Only a result carrying the latest issued generation is applied;
    /// anything else resolves to a silent outcome with no state impact.
    pub fn poll(&mut self) -> EventFetchOutcome {
        let Some(receiver) = &self.receiver else {
            return EventFetchOutcome::Pending;
        };

        let Ok((generation, result)) = receiver.try_recv() else {
            return EventFetchOutcome::Pending;
        };

        if generation != self.generation {
            return EventFetchOutcome::Stale;
        }

        // The latest fetch concluded; the channel is done.
        self.receiver = None;
        self.cancel = None;

        match result {
            Ok(events) => EventFetchOutcome::Applied(events),
            Err(FetchError::Cancelled) => EventFetchOutcome::Cancelled,
            Err(FetchError::Remote(msg)) => EventFetchOutcome::Failed(msg),
        }
    }
}

impl Default for EventFetcher {
    fn default() -> Self {
        Self::new()
    }
}

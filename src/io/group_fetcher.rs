//! Asynchronous group-listing fetching.
//!
//! Fetches one page of top-level groups on a background thread, with the
//! same generation/cancellation discipline as the event fetcher: a page or
//! filter change supersedes the in-flight request, and only the latest
//! issued request's result is ever applied.

use crate::model::{FilterParams, GroupPage};
use crate::providers::{CancelToken, FetchError, GroupProvider};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Outcome of polling the group fetch channel.
#[derive(Debug)]
pub enum GroupFetchOutcome {
    /// The latest-issued page fetch completed.
    Applied(GroupPage),
    /// A superseded fetch resolved late; discarded.
    Stale,
    /// The in-flight fetch observed its cancellation token; ignored.
    Cancelled,
    /// Genuine failure; prior group state must be preserved.
    Failed(String),
    /// Nothing to report.
    Pending,
}

/// Orchestrates background group-page fetches.
pub struct GroupFetcher {
    generation: u64,
    receiver: Option<Receiver<(u64, Result<GroupPage, FetchError>)>>,
    cancel: Option<CancelToken>,
    /// Page and parameters of the last issued request.
    last_request: Option<(usize, FilterParams)>,
}

impl GroupFetcher {
    /// Creates a fetcher with no active request.
    pub fn new() -> Self {
        Self {
            generation: 0,
            receiver: None,
            cancel: None,
            last_request: None,
        }
    }

    /// Whether a page fetch is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.receiver.is_some()
    }

    /// Whether `page`/`params` differ from the last issued request.
    pub fn needs_request(&self, page: usize, params: &FilterParams) -> bool {
        match &self.last_request {
            Some((last_page, last_params)) => *last_page != page || last_params != params,
            None => true,
        }
    }

    /// Issues a page fetch, superseding any in-flight one.
    pub fn request(
        &mut self,
        provider: Arc<dyn GroupProvider>,
        page: usize,
        limit: usize,
        params: FilterParams,
        repaint: Option<egui::Context>,
    ) {
        if let Some(token) = &self.cancel {
            token.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let token = CancelToken::new();
        self.cancel = Some(token.clone());
        self.last_request = Some((page, params.clone()));

        let (sender, receiver) = channel();
        self.receiver = Some(receiver);

        thread::spawn(move || {
            let result = provider.fetch_groups(page, limit, &params, &token);
            let _ = sender.send((generation, result));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Polls for a completed page fetch. Call once per frame.
    pub fn poll(&mut self) -> GroupFetchOutcome {
        let Some(receiver) = &self.receiver else {
            return GroupFetchOutcome::Pending;
        };

        let Ok((generation, result)) = receiver.try_recv() else {
            return GroupFetchOutcome::Pending;
        };

        if generation != self.generation {
            return GroupFetchOutcome::Stale;
        }

        self.receiver = None;
        self.cancel = None;

        match result {
            Ok(page) => GroupFetchOutcome::Applied(page),
            Err(FetchError::Cancelled) => GroupFetchOutcome::Cancelled,
            Err(FetchError::Remote(msg)) => GroupFetchOutcome::Failed(msg),
        }
    }
}

impl Default for GroupFetcher {
    fn default() -> Self {
        Self::new()
    }
}

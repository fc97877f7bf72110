//! Deterministic in-memory sample history.
//!
//! Serves a seeded synthetic dataset through both provider traits, for the
//! demo binary and for tests that need a provider with controllable timing.

use crate::model::{
    EventKind, FilterParams, Group, GroupKey, GroupPage, HistoryEvent,
};
use crate::providers::{CancelToken, EventProvider, FetchError, GroupProvider};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const ASSETS: &[&str] = &["ETH", "BTC", "DAI", "USDC", "MATIC", "LINK"];
const SPAM_ASSET: &str = "AIRDROP-SPAM";

/// Milliseconds between consecutive sample groups.
const GROUP_SPACING_MS: i64 = 3_600_000;

static DEFAULT_DATASET: Lazy<SampleDataset> = Lazy::new(|| SampleDataset::generate(42, 24));

/// A self-contained history: groups plus every child event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDataset {
    pub groups: Vec<Group>,
    pub events: Vec<HistoryEvent>,
}

impl SampleDataset {
    /// Generates a reproducible dataset with `group_count` groups.
    ///
    /// Groups alternate between plain transfers, swaps (adjacent trade
    /// legs, sometimes preceded by an approval), and matched movements.
    /// A few events use a spam asset or arrive hidden, so the filtering
    /// paths have something to chew on.
    pub fn generate(seed: u64, group_count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut groups = Vec::with_capacity(group_count);
        let mut events = Vec::new();
        let mut next_id: u64 = 1;

        for index in 0..group_count {
            // Index suffix keeps keys unique even if the random part repeats.
            let key = format!("0x{:08x}{:04x}", rng.gen::<u32>(), index);
            let timestamp = 1_700_000_000_000 + index as i64 * GROUP_SPACING_MS;
            let first_id = next_id;

            let label = match index % 3 {
                0 => {
                    generate_transfer(&mut rng, &mut events, &key, timestamp, &mut next_id);
                    "transfer"
                }
                1 => {
                    generate_swap(&mut rng, &mut events, &key, timestamp, &mut next_id);
                    "swap"
                }
                _ => {
                    generate_movement(&mut rng, &mut events, &key, timestamp, &mut next_id);
                    "withdrawal"
                }
            };

            let event_count = (next_id - first_id) as usize;
            groups.push(Group {
                key,
                event_count,
                timestamp,
                label: label.to_string(),
                lead_event: Some(first_id),
            });
        }

        Self { groups, events }
    }

    /// The shared default dataset (seed 42, 24 groups).
    pub fn default_dataset() -> Self {
        DEFAULT_DATASET.clone()
    }

    /// Serializes the dataset as pretty JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a dataset from a JSON file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the dataset to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn pick_asset(rng: &mut StdRng) -> String {
    ASSETS[rng.gen_range(0..ASSETS.len())].to_string()
}

fn generate_transfer(
    rng: &mut StdRng,
    events: &mut Vec<HistoryEvent>,
    key: &str,
    timestamp: i64,
    next_id: &mut u64,
) {
    let count = rng.gen_range(1..=3);
    for offset in 0..count {
        // Roughly one in eight transfers is an incoming spam airdrop.
        let spam = rng.gen_range(0..8) == 0;
        events.push(HistoryEvent {
            identifier: take_id(next_id),
            group_key: key.to_string(),
            asset: if spam {
                SPAM_ASSET.to_string()
            } else {
                pick_asset(rng)
            },
            kind: EventKind::Standard,
            hidden: rng.gen_range(0..12) == 0,
            timestamp: timestamp + offset,
            label: "receive".to_string(),
            amount: rng.gen_range(1..1_000) as f64 / 10.0,
        });
    }
}

fn generate_swap(
    rng: &mut StdRng,
    events: &mut Vec<HistoryEvent>,
    key: &str,
    timestamp: i64,
    next_id: &mut u64,
) {
    if rng.gen_bool(0.5) {
        events.push(HistoryEvent {
            identifier: take_id(next_id),
            group_key: key.to_string(),
            asset: pick_asset(rng),
            kind: EventKind::Standard,
            hidden: false,
            timestamp,
            label: "approve".to_string(),
            amount: 0.0,
        });
    }
    for (offset, label) in ["spend", "receive"].into_iter().enumerate() {
        events.push(HistoryEvent {
            identifier: take_id(next_id),
            group_key: key.to_string(),
            asset: pick_asset(rng),
            kind: EventKind::TradeLeg,
            hidden: false,
            timestamp: timestamp + 1 + offset as i64,
            label: label.to_string(),
            amount: rng.gen_range(1..1_000) as f64 / 10.0,
        });
    }
}

fn generate_movement(
    rng: &mut StdRng,
    events: &mut Vec<HistoryEvent>,
    key: &str,
    timestamp: i64,
    next_id: &mut u64,
) {
    let asset = pick_asset(rng);
    let amount = rng.gen_range(1..1_000) as f64 / 10.0;
    for (offset, (kind, label)) in [
        (EventKind::AssetMovement, "withdraw"),
        (EventKind::TradeLeg, "receive"),
    ]
    .into_iter()
    .enumerate()
    {
        events.push(HistoryEvent {
            identifier: take_id(next_id),
            group_key: key.to_string(),
            asset: asset.clone(),
            kind,
            hidden: false,
            timestamp: timestamp + offset as i64,
            label: label.to_string(),
            amount,
        });
    }
}

fn take_id(next_id: &mut u64) -> u64 {
    let id = *next_id;
    *next_id += 1;
    id
}

/// In-memory provider over a [`SampleDataset`].
///
/// Optional artificial latency makes fetches observable in the UI and lets
/// tests provoke supersession races; the call counter lets them assert how
/// many fetches actually ran.
pub struct SampleHistoryProvider {
    dataset: SampleDataset,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl SampleHistoryProvider {
    /// Creates a provider over a freshly generated dataset.
    pub fn new(seed: u64, group_count: usize) -> Self {
        Self::from_dataset(SampleDataset::generate(seed, group_count))
    }

    /// Creates a provider over an existing dataset.
    pub fn from_dataset(dataset: SampleDataset) -> Self {
        Self {
            dataset,
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Adds a fixed delay to every fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetch calls served so far (groups and events combined).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The backing dataset.
    pub fn dataset(&self) -> &SampleDataset {
        &self.dataset
    }

    fn begin_call(&self, token: &CancelToken) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(())
    }

    fn group_matches(&self, group: &Group, params: &FilterParams) -> bool {
        if params.from_timestamp.is_some_and(|from| group.timestamp < from) {
            return false;
        }
        if params.to_timestamp.is_some_and(|to| group.timestamp > to) {
            return false;
        }
        if let Some(asset) = &params.asset {
            return self
                .dataset
                .events
                .iter()
                .any(|e| e.group_key == group.key && &e.asset == asset);
        }
        true
    }
}

impl GroupProvider for SampleHistoryProvider {
    fn fetch_groups(
        &self,
        page: usize,
        limit: usize,
        params: &FilterParams,
        token: &CancelToken,
    ) -> Result<GroupPage, FetchError> {
        self.begin_call(token)?;

        let mut matching: Vec<Group> = self
            .dataset
            .groups
            .iter()
            .filter(|g| self.group_matches(g, params))
            .cloned()
            .collect();
        matching.sort_by_key(|g| g.timestamp);
        if !params.ascending {
            matching.reverse();
        }

        let found = matching.len();
        let groups = matching
            .into_iter()
            .skip(page.saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(GroupPage {
            groups,
            total: self.dataset.groups.len(),
            found,
            limit,
        })
    }
}

impl EventProvider for SampleHistoryProvider {
    fn fetch_events(
        &self,
        keys: &[GroupKey],
        _params: &FilterParams,
        token: &CancelToken,
    ) -> Result<Vec<HistoryEvent>, FetchError> {
        self.begin_call(token)?;

        let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        let mut events: Vec<HistoryEvent> = self
            .dataset
            .events
            .iter()
            .filter(|e| wanted.contains(e.group_key.as_str()))
            .cloned()
            .collect();
        // Keep each group's run structure: order by group, then arrival.
        events.sort_by(|a, b| {
            a.group_key
                .cmp(&b.group_key)
                .then(a.identifier.cmp(&b.identifier))
        });
        Ok(events)
    }
}

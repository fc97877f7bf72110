pub mod app;
pub mod cache;
pub mod domain;
pub mod io;
pub mod model;
pub mod providers;
pub mod sample;
pub mod state;
pub mod ui;

// Export the core data model
pub use model::{
    AssetId, EventId, EventKind, EventMapping, FilterParams, Group, GroupEntry,
    GroupKey, GroupPage, HistoryEvent,
};

// Export provider traits and fetch plumbing
pub use providers::{CancelToken, EventProvider, FetchError, GroupProvider, IgnoredAssets};

// Export the sample implementation
pub use sample::{SampleDataset, SampleHistoryProvider};

// Export the app composition root
pub use app::{AppState, HistoryCoordinator};

//! Application-level modules for the history viewer.
//!
//! This module contains the main coordinator and centralized state
//! management.

mod app_state;
mod coordinator;

pub use app_state::AppState;
pub use coordinator::HistoryCoordinator;

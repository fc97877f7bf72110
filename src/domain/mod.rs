//! Domain logic modules for the history viewer core.
//!
//! This module contains core business logic:
//! - Grouping (complete/displayed mapping construction, subgroup detection)
//! - Resolution (reverse lookup from a displayed event to its full subgroup)
//! - Flattening (mappings plus UI state into one addressable row sequence)
//!
//! Everything here is pure and synchronous; the fetch layer feeds events in,
//! and the windowed renderer consumes the flat row sequence that comes out.

pub mod flatten;
pub mod grouping;
pub mod resolver;

//! Caching modules for derived view values.

pub mod view_cache;

pub use view_cache::ViewCache;

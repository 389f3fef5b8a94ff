//! Generic in-memory query cache.
//!
//! This module provides a TMDB-agnostic coordination layer that:
//! - Keys entries by value (equal keys share one entry)
//! - Deduplicates concurrent requests for the same key
//! - Serves data without a network call while it is fresh
//! - Evicts entries nobody has subscribed to for a while
//!
//! Nothing is persisted; the cache lives as long as the process.

mod layer;
mod storage;
mod traits;

pub use layer::{CacheOptions, QueryClient, QuerySubscription};
pub use traits::QueryFetcher;

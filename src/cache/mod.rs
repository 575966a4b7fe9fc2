//! Cache layer: single-record persistence plus the staleness policy
//!
//! This module persists one cache record to a fixed file and classifies it at
//! read time into fresh-success, fresh-error, or stale. TTL expiry is purely a
//! read-time classification; nothing is ever evicted from disk.

mod staleness;
mod store;

pub use staleness::{evaluate, FetchDecision, TtlPolicy};
pub use store::{CacheError, CacheRecord, CacheStore};

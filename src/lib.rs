//! wttrline library
//!
//! Exposes the cache, fetch, reporting, and CLI modules for use by the binary
//! and the integration tests.

pub mod cache;
pub mod cli;
pub mod fetch;
pub mod report;

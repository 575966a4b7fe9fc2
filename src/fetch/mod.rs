//! Fetch layer: the wttr.in client behind a narrow trait seam
//!
//! The `Fetcher` trait is the reconciler's only view of the network, so tests
//! can drive it with scripted doubles while `WttrClient` performs the real
//! call.

use async_trait::async_trait;

mod wttr;

pub use wttr::{CurrentCondition, FetchError, LocalizedText, WttrClient, WttrReport};

/// A single-call weather source.
#[async_trait]
pub trait Fetcher {
    /// Fetches the current report for `location`, applying the
    /// implementation's own bounded timeout.
    async fn fetch_current(&self, location: &str) -> Result<WttrReport, FetchError>;
}

//! Command-line interface parsing for wttrline
//!
//! This module parses CLI arguments with clap and converts them into the typed
//! configuration handed to the reporter. All cache and fetch knobs live here;
//! nothing downstream reads flags or environment on its own.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cache::TtlPolicy;

/// wttrline - current weather for your status bar, cached locally
#[derive(Parser, Debug)]
#[command(name = "wttrline")]
#[command(about = "Print a one-line wttr.in weather summary, cached locally")]
#[command(version)]
pub struct Cli {
    /// Target location: a city or address name. For details see the wttr.in
    /// documentation: https://github.com/chubin/wttr.in
    #[arg(short, long, default_value = "Shenzhen")]
    pub location: String,

    /// Language requested from wttr.in for the weather description
    #[arg(long, default_value = "zh-cn")]
    pub lang: String,

    /// Seconds a successful fetch stays fresh
    #[arg(long, value_name = "SECONDS", default_value_t = 600)]
    pub cache_ttl: u64,

    /// Seconds a failed fetch suppresses new attempts
    #[arg(long, value_name = "SECONDS", default_value_t = 15)]
    pub error_ttl: u64,

    /// Seconds allowed for the whole fetch round trip
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    pub timeout: u64,

    /// Cache file path (defaults to a fixed file in the OS temp directory)
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,
}

/// Typed configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Location passed to the fetcher
    pub location: String,
    /// Language requested from wttr.in
    pub lang: String,
    /// TTL windows for the cache regimes
    pub ttl: TtlPolicy,
    /// Bound on the fetch round trip
    pub timeout: Duration,
    /// Cache file override, if any
    pub cache_file: Option<PathBuf>,
}

impl ReportConfig {
    /// Creates a ReportConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            location: cli.location.clone(),
            lang: cli.lang.clone(),
            ttl: TtlPolicy {
                success_ttl: Duration::from_secs(cli.cache_ttl),
                error_ttl: Duration::from_secs(cli.error_ttl),
            },
            timeout: Duration::from_secs(cli.timeout),
            cache_file: cli.cache_file.clone(),
        }
    }
}

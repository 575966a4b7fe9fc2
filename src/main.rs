//! wttrline - current weather for your status bar
//!
//! Fetches the current weather from wttr.in and prints a one-line summary,
//! caching the result (or the failure) in a temp-directory file between runs
//! so repeated status-bar invocations stay cheap.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wttrline::cache::CacheStore;
use wttrline::cli::{Cli, ReportConfig};
use wttrline::fetch::WttrClient;
use wttrline::report::Reporter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = ReportConfig::from_cli(&cli);

    // Diagnostics go to stderr; stdout carries only the rendered line.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let store = match &config.cache_file {
        Some(path) => CacheStore::with_path(path.clone()),
        None => CacheStore::new(),
    };
    let fetcher = WttrClient::new()
        .with_lang(config.lang.as_str())
        .with_timeout(config.timeout);
    let reporter = Reporter::new(store, fetcher, config.ttl, config.location);

    match reporter.run(Utc::now()).await {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

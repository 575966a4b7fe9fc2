//! wttr.in API client
//!
//! This module fetches the current weather report from the wttr.in JSON endpoint
//! and validates it down to the single current-condition record the renderer
//! needs. Responses that parse but cannot render (no condition entry, empty
//! temperature) are rejected here so they never reach the cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::Fetcher;

/// Base URL for the wttr.in service
const WTTR_BASE_URL: &str = "https://wttr.in";

/// Language requested from wttr.in by default
const DEFAULT_LANG: &str = "zh-cn";

/// Default bound on the whole request round trip
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when fetching the weather report
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request failed below the HTTP layer (DNS, connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The server answered with a non-success status code
    #[error("unexpected response status: {0}")]
    Status(StatusCode),

    /// The response body was not valid wttr.in JSON
    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but is missing the data needed to render
    #[error("malformed weather report: {0}")]
    MalformedReport(String),

    /// The base URL and location do not form a valid request URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// A localized text entry as wttr.in represents it (`{"value": "..."}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedText {
    pub value: String,
}

/// One entry of the `current_condition` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCondition {
    /// Temperature in Celsius, as wttr.in reports it (a decimal string)
    #[serde(rename = "temp_C")]
    pub temp_c: String,
    /// English weather description
    #[serde(rename = "weatherDesc", default)]
    pub weather_desc: Vec<LocalizedText>,
    /// Weather description localized to the requested language
    #[serde(
        rename = "lang_zh-cn",
        alias = "lang_zh",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub localized_desc: Vec<LocalizedText>,
}

/// The wttr.in `format=j1` response, reduced to the fields we render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WttrReport {
    pub current_condition: Vec<CurrentCondition>,
}

impl WttrReport {
    /// Returns the single current condition, or why the report cannot render.
    ///
    /// A valid report carries exactly one `current_condition` entry with a
    /// non-empty temperature.
    pub fn current(&self) -> Result<&CurrentCondition, FetchError> {
        let current = match self.current_condition.as_slice() {
            [current] => current,
            other => {
                return Err(FetchError::MalformedReport(format!(
                    "expected exactly 1 current_condition entry, got {}",
                    other.len()
                )))
            }
        };
        if current.temp_c.is_empty() {
            return Err(FetchError::MalformedReport(
                "current temp_C is empty".to_string(),
            ));
        }
        Ok(current)
    }
}

impl CurrentCondition {
    /// First non-empty description, preferring the localized one.
    pub fn description(&self) -> Option<&str> {
        self.localized_desc
            .iter()
            .chain(self.weather_desc.iter())
            .map(|text| text.value.trim())
            .find(|value| !value.is_empty())
    }

    /// The rendered status line, e.g. `晴天 23°C`, or `23°C` alone when no
    /// description is available.
    pub fn display_line(&self) -> String {
        match self.description() {
            Some(description) => format!("{} {}°C", description, self.temp_c),
            None => format!("{}°C", self.temp_c),
        }
    }
}

/// Client for fetching the current weather report from wttr.in
#[derive(Debug, Clone)]
pub struct WttrClient {
    client: Client,
    base_url: String,
    lang: String,
    timeout: Duration,
}

impl Default for WttrClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WttrClient {
    /// Creates a new WttrClient with default settings.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: WTTR_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a new WttrClient with a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Overrides the base URL, e.g. to point at a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the language requested for the weather description.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Overrides the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the request URL with the location as an escaped path segment.
    fn request_url(&self, location: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| FetchError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .push(location);
        url.query_pairs_mut()
            .append_pair("lang", &self.lang)
            .append_pair("format", "j1");
        Ok(url)
    }

    /// Splits reqwest's single error type into the deadline and transport cases.
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
impl Fetcher for WttrClient {
    /// Fetches the current report for `location`.
    ///
    /// The timeout bounds the entire round trip: connect, response, and body
    /// read. Non-success status codes are rejected without touching the body.
    async fn fetch_current(&self, location: &str) -> Result<WttrReport, FetchError> {
        let url = self.request_url(location)?;
        debug!(%url, "requesting weather report");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.classify(err))?;
        let report: WttrReport = serde_json::from_str(&body)?;
        // Validate before returning so the cache only ever holds renderable
        // reports.
        report.current()?;
        Ok(report)
    }
}

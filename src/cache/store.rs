//! Cache store for persisting the last fetch outcome to disk
//!
//! Provides a `CacheStore` that reads and writes a single `CacheRecord` as a JSON
//! file. An absent or empty file is the zero-value record; a non-empty file that
//! fails to parse is a hard error, never silently treated as empty.

use chrono::{DateTime, TimeZone, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the cache record inside the OS temp directory
const CACHE_FILE_NAME: &str = "wttrline-cache.json";

/// Errors that can occur while reading or writing the cache file
///
/// These are always fatal to the invocation; callers never fall back to an
/// empty record when the store fails.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file exists but could not be read
    #[error("failed to read cache file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },

    /// The cache file holds non-empty content that is not a valid record
    #[error("cache file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The record could not be serialized
    #[error("failed to encode cache record: {0}")]
    Encode(serde_json::Error),

    /// The cache file could not be written
    #[error("failed to write cache file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },
}

/// The single persisted cache entity: the last good payload plus the most
/// recent fetch outcome.
///
/// Timestamps are Unix seconds with 0 as the "never" sentinel, so a record
/// written by an older build with absent fields still loads as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: serde::de::DeserializeOwned"
))]
pub struct CacheRecord<T> {
    /// Last successfully fetched payload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    /// Unix seconds of the last successful refresh; 0 means never
    #[serde(default)]
    pub fetched_at: i64,
    /// Unix seconds of the most recent failed attempt; 0 means no error recorded
    #[serde(default)]
    pub error_at: i64,
    /// Cause of the most recent failed attempt; empty means no error recorded
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_message: String,
}

impl<T> Default for CacheRecord<T> {
    fn default() -> Self {
        Self {
            payload: None,
            fetched_at: 0,
            error_at: 0,
            error_message: String::new(),
        }
    }
}

impl<T> CacheRecord<T> {
    /// When the payload was last successfully refreshed, if ever.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        instant(self.fetched_at)
    }

    /// When the most recent fetch attempt failed, if an error is recorded.
    pub fn last_error(&self) -> Option<DateTime<Utc>> {
        instant(self.error_at)
    }

    /// Merges a successful fetch: replaces the payload and clears any recorded
    /// error.
    pub fn record_success(&mut self, payload: T, now: DateTime<Utc>) {
        self.payload = Some(payload);
        self.fetched_at = now.timestamp();
        self.error_at = 0;
        self.error_message.clear();
    }

    /// Merges a failed fetch: records the failure while leaving a previously
    /// good payload and its timestamp untouched.
    pub fn record_failure(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.error_at = now.timestamp();
        self.error_message = message.into();
    }
}

/// Converts a Unix-seconds sentinel field into an instant.
fn instant(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    Utc.timestamp_opt(secs, 0).single()
}

/// Reads and writes the single cache record at a fixed path
///
/// The default location is a constant file name inside the OS temp directory,
/// so repeated invocations of the binary share one record per machine.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Path of the cache file
    path: PathBuf,
}

impl CacheStore {
    /// Creates a store at the default temp-directory location.
    pub fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(CACHE_FILE_NAME),
        }
    }

    /// Creates a store at a custom path.
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted record.
    ///
    /// A missing or empty file yields the zero-value record. Non-empty content
    /// that does not parse is a [`CacheError::Corrupt`] surfaced to the caller.
    pub fn load<T: DeserializeOwned>(&self) -> Result<CacheRecord<T>, CacheError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file, starting empty");
                return Ok(CacheRecord::default());
            }
            Err(source) => {
                return Err(CacheError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.is_empty() {
            return Ok(CacheRecord::default());
        }
        serde_json::from_slice(&raw).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Persists the record, creating the parent directory if needed.
    pub fn save<T: Serialize>(&self, record: &CacheRecord<T>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(record).map_err(CacheError::Encode)?;
        fs::write(&self.path, json).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "cache record saved");
        Ok(())
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

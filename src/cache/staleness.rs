//! Staleness policy for the cached record
//!
//! Decides, for a loaded record and the current time, whether a fetch is
//! required. The error regime is checked before the success regime: a recent
//! failure is re-surfaced verbatim during its cool-down window instead of
//! triggering another attempt against a failing upstream.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

use super::CacheRecord;

/// TTL windows for the two cache regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// How long a successful fetch stays fresh
    pub success_ttl: Duration,
    /// How long a failed fetch suppresses new attempts
    pub error_ttl: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            success_ttl: Duration::from_secs(600), // 10 minutes
            error_ttl: Duration::from_secs(15),
        }
    }
}

/// Outcome of evaluating a record against the TTL policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDecision {
    /// The cached payload is still fresh; serve it without fetching.
    ServeCached,
    /// A recent failure is still cooling down; re-surface its message and stop.
    ServeCachedError(String),
    /// No usable cached state; a fetch is required.
    Fetch,
}

/// Classifies the record into one of the three regimes.
///
/// An active error takes priority over the success timestamp: until the error
/// TTL elapses the stored message is the invocation's result, even when a
/// still-fresh payload exists underneath.
pub fn evaluate<T>(record: &CacheRecord<T>, now: DateTime<Utc>, policy: &TtlPolicy) -> FetchDecision {
    if let Some(failed_at) = record.last_error() {
        if older_than(now.signed_duration_since(failed_at), policy.error_ttl) {
            return FetchDecision::Fetch;
        }
        return FetchDecision::ServeCachedError(record.error_message.clone());
    }

    match record.last_success() {
        Some(fetched_at) if !older_than(now.signed_duration_since(fetched_at), policy.success_ttl) => {
            FetchDecision::ServeCached
        }
        // Never fetched successfully: infinitely stale.
        _ => FetchDecision::Fetch,
    }
}

/// Whether `age` strictly exceeds `ttl`. A negative age (clock moved backwards
/// or a record from the future) counts as not yet expired.
fn older_than(age: TimeDelta, ttl: Duration) -> bool {
    match age.to_std() {
        Ok(age) => age > ttl,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn policy() -> TtlPolicy {
        TtlPolicy {
            success_ttl: Duration::from_secs(600),
            error_ttl: Duration::from_secs(15),
        }
    }

    fn record() -> CacheRecord<String> {
        CacheRecord::default()
    }

    #[test]
    fn test_empty_record_requires_fetch() {
        let now = Utc::now();
        assert_eq!(evaluate(&record(), now, &policy()), FetchDecision::Fetch);
    }

    #[test]
    fn test_fresh_success_serves_cached() {
        let now = Utc::now();
        let mut r = record();
        r.record_success("payload".into(), now - TimeDelta::seconds(60));

        assert_eq!(evaluate(&r, now, &policy()), FetchDecision::ServeCached);
    }

    #[test]
    fn test_success_at_exact_ttl_boundary_is_still_fresh() {
        // Whole-second instant: record timestamps are Unix seconds, so a
        // fractional `now` would push the age past the boundary.
        let now = Utc
            .timestamp_opt(Utc::now().timestamp(), 0)
            .single()
            .expect("valid instant");
        let mut r = record();
        r.record_success("payload".into(), now - TimeDelta::seconds(600));

        // Expiry is strict: only strictly older than the TTL forces a fetch.
        assert_eq!(evaluate(&r, now, &policy()), FetchDecision::ServeCached);
    }

    #[test]
    fn test_stale_success_requires_fetch() {
        let now = Utc::now();
        let mut r = record();
        r.record_success("payload".into(), now - TimeDelta::seconds(601));

        assert_eq!(evaluate(&r, now, &policy()), FetchDecision::Fetch);
    }

    #[test]
    fn test_recent_error_is_terminal_and_verbatim() {
        let now = Utc::now();
        let mut r = record();
        r.record_failure("send request failed: no route to host", now - TimeDelta::seconds(1));

        assert_eq!(
            evaluate(&r, now, &policy()),
            FetchDecision::ServeCachedError("send request failed: no route to host".to_string())
        );
    }

    #[test]
    fn test_expired_error_requires_fetch() {
        let now = Utc::now();
        let mut r = record();
        r.record_failure("boom", now - TimeDelta::seconds(16));

        assert_eq!(evaluate(&r, now, &policy()), FetchDecision::Fetch);
    }

    #[test]
    fn test_error_regime_shadows_fresh_success() {
        let now = Utc::now();
        let mut r = record();
        r.record_success("payload".into(), now - TimeDelta::seconds(30));
        r.record_failure("boom", now - TimeDelta::seconds(2));

        assert_eq!(
            evaluate(&r, now, &policy()),
            FetchDecision::ServeCachedError("boom".to_string())
        );
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let now = Utc::now();
        let mut r = record();
        r.record_success("payload".into(), now + TimeDelta::seconds(30));

        assert_eq!(evaluate(&r, now, &policy()), FetchDecision::ServeCached);
    }
}

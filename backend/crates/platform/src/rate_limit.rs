//! Rate Limiting Infrastructure
//!
//! In-process sliding-window limiter keyed by an arbitrary client identity.
//!
//! Every key owns an ordered log of accepted request times. A check prunes
//! the entries that fell out of the window, then compares the remainder with
//! the capacity. Acquisition hands out a [`RatePermit`] that holds the key's
//! log exclusively, so prune, check and record happen as one step even when
//! the caller does other work before deciding to record.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    pub fn window_delta(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.window_ms())
    }
}

/// Rate limit snapshot for a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// `max_requests - live entries`; not clamped at zero
    pub remaining: i64,
    /// When the oldest live entry leaves the window
    pub reset_at: Option<DateTime<Utc>>,
}

/// Returned when a key has used up its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Rate limit exceeded, next request allowed at {next_allowed_at}")]
pub struct RateLimitDenied {
    pub next_allowed_at: DateTime<Utc>,
    /// `next_allowed_at` minus the instant the check ran at
    pub retry_after: TimeDelta,
}

type RequestLog = VecDeque<DateTime<Utc>>;

/// Drop every entry at or before `now - span`.
fn prune(log: &mut RequestLog, now: DateTime<Utc>, span: TimeDelta) {
    let cutoff = now - span;
    while log.front().is_some_and(|&at| at <= cutoff) {
        log.pop_front();
    }
}

/// Sliding-window limiter
///
/// Logs are created lazily on the first acquisition or record for a key and
/// are only ever pruned, never removed.
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    logs: Mutex<HashMap<String, Arc<Mutex<RequestLog>>>>,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            logs: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    async fn log_for(&self, key: &str) -> Arc<Mutex<RequestLog>> {
        let mut logs = self.logs.lock().await;
        logs.entry(key.to_owned()).or_default().clone()
    }

    async fn existing_log(&self, key: &str) -> Option<Arc<Mutex<RequestLog>>> {
        self.logs.lock().await.get(key).cloned()
    }

    /// Check whether `key` may make a request at `now`.
    ///
    /// On success the returned permit keeps the key locked until it is
    /// recorded or dropped; concurrent callers for the same key wait. Nothing
    /// is appended unless [`RatePermit::record`] is called.
    pub async fn try_acquire(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<RatePermit, RateLimitDenied> {
        let span = self.config.window_delta();
        let mut log = self.log_for(key).await.lock_owned().await;
        prune(&mut log, now, span);

        if log.len() as u64 >= u64::from(self.config.max_requests) {
            let oldest = log.front().copied().unwrap_or(now);
            let next_allowed_at = oldest + span;
            tracing::debug!(
                key,
                live = log.len(),
                next_allowed_at = %next_allowed_at,
                "Rate limit window full"
            );
            return Err(RateLimitDenied {
                next_allowed_at,
                retry_after: next_allowed_at - now,
            });
        }

        Ok(RatePermit { log })
    }

    /// Append `now` to the key's log (after pruning it).
    pub async fn record(&self, key: &str, now: DateTime<Utc>) {
        let log = self.log_for(key).await;
        let mut log = log.lock().await;
        prune(&mut log, now, self.config.window_delta());
        log.push_back(now);
    }

    /// `max_requests` minus the live entries. Negative when a key was
    /// recorded past its capacity.
    pub async fn remaining(&self, key: &str, now: DateTime<Utc>) -> i64 {
        self.status(key, now).await.remaining
    }

    pub async fn status(&self, key: &str, now: DateTime<Utc>) -> RateLimitResult {
        let max = i64::from(self.config.max_requests);
        let Some(log) = self.existing_log(key).await else {
            return RateLimitResult {
                allowed: max > 0,
                remaining: max,
                reset_at: None,
            };
        };

        let span = self.config.window_delta();
        let mut log = log.lock().await;
        prune(&mut log, now, span);

        let remaining = max - log.len() as i64;
        RateLimitResult {
            allowed: remaining > 0,
            remaining,
            reset_at: log.front().map(|&oldest| oldest + span),
        }
    }
}

/// Exclusive hold on one key's log, granted by
/// [`SlidingWindowLimiter::try_acquire`].
pub struct RatePermit {
    log: OwnedMutexGuard<RequestLog>,
}

impl RatePermit {
    /// Consume the slot. Dropping the permit instead leaves the log as it was.
    pub fn record(mut self, now: DateTime<Utc>) {
        self.log.push_back(now);
    }
}

impl fmt::Debug for RatePermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatePermit")
            .field("live", &self.log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, s).unwrap()
    }

    fn one_per_half_hour() -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(30 * 60),
        })
    }

    #[test]
    fn test_window_conversions() {
        let config = one_per_half_hour().config().clone();
        assert_eq!(config.window_ms(), 1_800_000);
        assert_eq!(config.window_delta(), TimeDelta::minutes(30));
    }

    #[test]
    fn test_prune_is_inclusive_at_cutoff() {
        let mut log: RequestLog = [at(12, 0, 0), at(12, 0, 1)].into_iter().collect();
        prune(&mut log, at(12, 30, 0), TimeDelta::minutes(30));
        assert_eq!(log, [at(12, 0, 1)]);
    }

    #[tokio::test]
    async fn test_denied_until_window_passes() {
        let limiter = one_per_half_hour();

        limiter.try_acquire("c1", at(12, 0, 0)).await.unwrap().record(at(12, 0, 0));

        let denied = limiter.try_acquire("c1", at(12, 10, 0)).await.unwrap_err();
        assert_eq!(denied.next_allowed_at, at(12, 30, 0));
        assert_eq!(denied.retry_after, TimeDelta::minutes(20));

        assert!(limiter.try_acquire("c1", at(12, 30, 0)).await.is_ok());
        assert!(limiter.try_acquire("c1", at(12, 30, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_permit_does_not_consume() {
        let limiter = one_per_half_hour();

        let permit = limiter.try_acquire("c1", at(9, 0, 0)).await.unwrap();
        drop(permit);

        assert!(limiter.try_acquire("c1", at(9, 0, 5)).await.is_ok());
        assert_eq!(limiter.remaining("c1", at(9, 0, 5)).await, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = one_per_half_hour();

        limiter.record("c1", at(8, 0, 0)).await;

        assert!(limiter.try_acquire("c1", at(8, 1, 0)).await.is_err());
        assert!(limiter.try_acquire("c2", at(8, 1, 0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_remaining_is_not_clamped() {
        let limiter = one_per_half_hour();

        limiter.record("c1", at(10, 0, 0)).await;
        limiter.record("c1", at(10, 1, 0)).await;

        assert_eq!(limiter.remaining("c1", at(10, 2, 0)).await, -1);
        // First entry ages out
        assert_eq!(limiter.remaining("c1", at(10, 30, 0)).await, 0);
        assert_eq!(limiter.remaining("c1", at(10, 31, 0)).await, 1);
    }

    #[tokio::test]
    async fn test_status() {
        let limiter = one_per_half_hour();

        let fresh = limiter.status("c1", at(7, 0, 0)).await;
        assert_eq!(
            fresh,
            RateLimitResult {
                allowed: true,
                remaining: 1,
                reset_at: None,
            }
        );

        limiter.record("c1", at(7, 0, 0)).await;
        let used = limiter.status("c1", at(7, 5, 0)).await;
        assert!(!used.allowed);
        assert_eq!(used.remaining, 0);
        assert_eq!(used.reset_at, Some(at(7, 30, 0)));
    }

    #[tokio::test]
    async fn test_permit_serializes_same_key() {
        let limiter = Arc::new(one_per_half_hour());
        let now = at(11, 0, 0);

        let permit = limiter.try_acquire("c1", now).await.unwrap();

        let contender = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.try_acquire("c1", now).await.map(|_| ()) })
        };

        tokio::task::yield_now().await;
        permit.record(now);

        let outcome = contender.await.unwrap();
        assert_eq!(
            outcome,
            Err(RateLimitDenied {
                next_allowed_at: at(11, 30, 0),
                retry_after: TimeDelta::minutes(30),
            })
        );
    }
}

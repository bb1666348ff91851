//! Fixed-window rate limiting for validation-heavy operations
//!
//! Buckets are keyed by caller-supplied strings (typically
//! `"{identifier}:{action}"`), counted in memory behind a mutex. When a
//! window elapses the bucket restarts from zero; there is no sliding
//! behavior and no persistence. Counters are per-process and best-effort,
//! a UX throttle rather than a security boundary.

use std::{
    collections::HashMap,
    env,
    sync::Mutex,
    time::{Duration, Instant},
};

const DEFAULT_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_WINDOW_SECONDS: u64 = 60;

/// Decides whether a keyed action may proceed right now.
///
/// An allowed call consumes one attempt from the key's bucket; a denied call
/// consumes nothing. Injected into `DataValidator` so tests and alternative
/// backends can substitute their own policy.
pub trait RateLimiter: Send + Sync {
    fn check_and_increment(&self, key: &str) -> bool;
}

struct Bucket {
    window_start: Instant,
    count: u32,
}

pub struct FixedWindowRateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    window: Duration,
    max_attempts: u32,
}

impl FixedWindowRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            window,
            max_attempts,
        }
    }

    /// Build from `VALIDATION_RATE_LIMIT_MAX_ATTEMPTS` and
    /// `VALIDATION_RATE_LIMIT_WINDOW_SECONDS`, falling back to 10 attempts
    /// per 60 seconds.
    pub fn from_env() -> Self {
        let max_attempts = env_u32("VALIDATION_RATE_LIMIT_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS);
        let window_seconds =
            env_u64("VALIDATION_RATE_LIMIT_WINDOW_SECONDS", DEFAULT_WINDOW_SECONDS).max(1);

        tracing::info!(max_attempts, window_seconds, "Validation rate limiter configured");

        Self::new(max_attempts, Duration::from_secs(window_seconds))
    }

    /// Attempts left in the current window without consuming one.
    pub fn remaining(&self, key: &str) -> u32 {
        let buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        match buckets.get(key) {
            Some(bucket) if bucket.window_start.elapsed() < self.window => {
                self.max_attempts.saturating_sub(bucket.count)
            }
            _ => self.max_attempts,
        }
    }
}

impl Default for FixedWindowRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::from_secs(DEFAULT_WINDOW_SECONDS))
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn check_and_increment(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");

        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            window_start: now,
            count: 0,
        });

        if now.duration_since(bucket.window_start) >= self.window {
            bucket.window_start = now;
            bucket.count = 0;
        }

        if bucket.count >= self.max_attempts {
            return false;
        }

        bucket.count += 1;
        true
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => match raw.parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!("Invalid value for {key} (`{raw}`), using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!("Invalid value for {key} (`{raw}`), using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_eleventh_attempt_is_denied() {
        let limiter = FixedWindowRateLimiter::default();

        for _ in 0..10 {
            assert!(limiter.check_and_increment("user-1:login"));
        }
        assert!(!limiter.check_and_increment("user-1:login"));
    }

    #[test]
    fn test_keys_are_isolated() {
        let limiter = FixedWindowRateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check_and_increment("alice:insertTransaction"));
        assert!(!limiter.check_and_increment("alice:insertTransaction"));
        assert!(limiter.check_and_increment("bob:insertTransaction"));
    }

    #[test]
    fn test_window_reset_allows_again() {
        let limiter = FixedWindowRateLimiter::new(1, Duration::from_millis(40));

        assert!(limiter.check_and_increment("key"));
        assert!(!limiter.check_and_increment("key"));

        thread::sleep(Duration::from_millis(60));

        assert!(limiter.check_and_increment("key"));
    }

    #[test]
    fn test_remaining_counts_down() {
        let limiter = FixedWindowRateLimiter::new(3, Duration::from_secs(60));

        assert_eq!(limiter.remaining("k"), 3);
        limiter.check_and_increment("k");
        assert_eq!(limiter.remaining("k"), 2);
        limiter.check_and_increment("k");
        limiter.check_and_increment("k");
        assert_eq!(limiter.remaining("k"), 0);

        limiter.check_and_increment("k");
        assert_eq!(limiter.remaining("k"), 0);
    }
}

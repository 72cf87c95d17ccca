//! Run retention policy
//!
//! Runs are never closed by the claims themselves, so a long-lived process
//! bounds its memory through this policy or through explicit `close_run`.
//! Both limits are unset by default.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Cap on live runs; the least recently appended-to run is evicted first
    pub max_runs: Option<usize>,
    /// Runs idle for longer than this are evicted by `evict_idle`
    pub idle_ttl: Option<Duration>,
}

impl RetentionPolicy {
    /// No limits
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_runs(mut self, max_runs: usize) -> Self {
        self.max_runs = Some(max_runs);
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    /// Whether a run last appended to at `last_append` has outlived the TTL
    pub fn is_expired(&self, last_append: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.idle_ttl {
            Some(ttl) => now - last_append > ttl,
            None => false,
        }
    }

    /// How many runs must go so that one more fits
    pub fn overflow(&self, live_runs: usize) -> usize {
        match self.max_runs {
            Some(max) if live_runs >= max => live_runs + 1 - max,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unbounded_never_expires() {
        let policy = RetentionPolicy::unbounded();
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert!(!policy.is_expired(t0, t1));
        assert_eq!(policy.overflow(1_000_000), 0);
    }

    #[test]
    fn test_idle_ttl() {
        let policy = RetentionPolicy::unbounded().with_idle_ttl(Duration::seconds(60));
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!policy.is_expired(t0, t0 + Duration::seconds(60)));
        assert!(policy.is_expired(t0, t0 + Duration::seconds(61)));
    }

    #[test]
    fn test_overflow() {
        let policy = RetentionPolicy::unbounded().with_max_runs(2);
        assert_eq!(policy.overflow(0), 0);
        assert_eq!(policy.overflow(1), 0);
        assert_eq!(policy.overflow(2), 1);
        assert_eq!(policy.overflow(3), 2);
    }
}

//! Attempt limiter for witness code entry.
//!
//! A witness code is four digits, so attempts at guessing one are bounded
//! both per time window and over the lifetime of the limiter. The limiter is
//! stored on the donor's [`Provided`](crate::Provided) details and saved after
//! every attempt.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Counts attempts in fixed windows and over its whole lifetime.
///
/// A window opens at the first attempt, and the next one opens at the first
/// attempt made once `window` has passed. Every call to [`Limiter::allow`]
/// is counted, allowed or not.
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use make_lpa_core::Limiter;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
/// let mut limiter = Limiter::new(Duration::minutes(1), 2, 10);
///
/// assert!(limiter.allow(now));
/// assert!(limiter.allow(now));
/// assert!(!limiter.allow(now));
/// assert!(limiter.allow(now + Duration::minutes(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limiter {
    #[serde(with = "duration_secs")]
    window: Duration,
    max_per_window: u32,
    max_total: u32,
    window_started_at: Option<DateTime<Utc>>,
    window_attempts: u32,
    total_attempts: u32,
}

impl Limiter {
    #[must_use]
    pub const fn new(window: Duration, max_per_window: u32, max_total: u32) -> Self {
        Self {
            window,
            max_per_window,
            max_total,
            window_started_at: None,
            window_attempts: 0,
            total_attempts: 0,
        }
    }

    /// Limits used for witness codes: 5 attempts a minute, 10 in total.
    #[must_use]
    pub const fn witness_code() -> Self {
        Self::new(Duration::minutes(1), 5, 10)
    }

    /// Record an attempt at `now` and say whether it may go ahead.
    pub fn allow(&mut self, now: DateTime<Utc>) -> bool {
        let in_window = self.window_started_at.is_some_and(|start| {
            start
                .checked_add_signed(self.window)
                .is_none_or(|end| now < end)
        });

        if !in_window {
            self.window_started_at = Some(now);
            self.window_attempts = 0;
        }

        self.window_attempts = self.window_attempts.saturating_add(1);
        self.total_attempts = self.total_attempts.saturating_add(1);

        self.window_attempts <= self.max_per_window && self.total_attempts <= self.max_total
    }

    /// Attempts left before the lifetime limit is reached.
    #[must_use]
    pub const fn remaining_total(&self) -> u32 {
        self.max_total.saturating_sub(self.total_attempts)
    }

    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.total_attempts
    }
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("window of {secs}s out of range")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_sixth_attempt_in_window_denied() {
        let mut limiter = Limiter::new(Duration::minutes(1), 5, 10);
        let now = start();

        let results: Vec<bool> = (0..6)
            .map(|i| limiter.allow(now + Duration::milliseconds(i * 100)))
            .collect();

        assert_eq!(results, [true, true, true, true, true, false]);
    }

    #[test]
    fn test_allowed_again_after_window() {
        let mut limiter = Limiter::witness_code();
        let now = start();

        for _ in 0..6 {
            limiter.allow(now);
        }
        assert!(!limiter.allow(now + Duration::seconds(59)));
        assert!(limiter.allow(now + Duration::minutes(1)));
    }

    #[test]
    fn test_lifetime_limit_is_permanent() {
        let mut limiter = Limiter::witness_code();
        let mut now = start();

        for _ in 0..10 {
            assert!(limiter.allow(now));
            now += Duration::minutes(2);
        }

        assert_eq!(limiter.remaining_total(), 0);
        for _ in 0..5 {
            assert!(!limiter.allow(now));
            now += Duration::hours(1);
        }
    }

    #[test]
    fn test_denied_attempts_use_lifetime_budget() {
        let mut limiter = Limiter::witness_code();
        let now = start();

        for _ in 0..8 {
            limiter.allow(now);
        }
        assert_eq!(limiter.total_attempts(), 8);
        assert_eq!(limiter.remaining_total(), 2);

        let later = now + Duration::minutes(5);
        assert!(limiter.allow(later));
        assert!(limiter.allow(later));
        assert!(!limiter.allow(later));
    }

    #[test]
    fn test_serde_roundtrip_keeps_state() {
        let mut limiter = Limiter::witness_code();
        limiter.allow(start());

        let json = serde_json::to_value(&limiter).unwrap();
        assert_eq!(json["window"], 60);
        assert_eq!(json["totalAttempts"], 1);

        let restored: Limiter = serde_json::from_value(json).unwrap();
        assert_eq!(restored, limiter);
    }
}

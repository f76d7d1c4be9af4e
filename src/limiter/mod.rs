//! The rate limiter orchestrator
//!
//! [`RateLimiter`] wires a [`RateLimitPolicy`] to a [`UsageStore`]: it
//! canonicalizes keys, bounds the history fetch to exactly what the policy
//! asked for, converts every timestamp into the operating time zone before
//! the policy sees it, and writes new usages through in UTC.
//!
//! Checking and recording are deliberately not transactional: two concurrent
//! requests for one identity can both observe quota-available and both
//! record, exceeding the limit by one. Closing that window takes a
//! conditional insert on the storage side, not a lock in here.

use crate::error::Result;
use crate::policy::RateLimitPolicy;
use crate::store::UsageStore;
use crate::usage::Usage;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Default operating time zone when none is configured.
pub const DEFAULT_TIMEZONE: Tz = Tz::Europe__Berlin;

/// Orchestrates quota decisions over a policy and a usage store.
pub struct RateLimiter<S> {
    policy: Box<dyn RateLimitPolicy>,
    store: S,
    timezone: Tz,
    retention: Option<Duration>,
}

impl<S: UsageStore> RateLimiter<S> {
    /// Create a limiter with the default operating time zone and no
    /// retention configured.
    pub fn new(policy: impl RateLimitPolicy + 'static, store: S) -> Self {
        Self {
            policy: Box::new(policy),
            store,
            timezone: DEFAULT_TIMEZONE,
            retention: None,
        }
    }

    /// Set the operating time zone used for calendar-window decisions.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set how long usage records are kept before housekeeping drops them.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    /// The operating time zone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Check whether an attempt at `at_time` would exceed quota.
    ///
    /// Fetches exactly `requested_history()` records for the pair, converts
    /// them and `at_time` into the operating zone, and delegates to the
    /// policy. Returns the offending usage when quota is exhausted, `None`
    /// when the attempt is allowed. No side effect beyond the store read.
    pub async fn check_offending_usage(
        &self,
        scope: impl ToString,
        identity: impl ToString,
        at_time: DateTime<impl TimeZone>,
    ) -> Result<Option<Usage>> {
        let scope = scope.to_string();
        let identity = identity.to_string();

        let requested = self.policy.requested_history();
        let history = self.store.get_usages(&scope, &identity, requested).await?;
        debug!(
            %scope,
            %identity,
            count = history.len(),
            requested,
            "checking usage history"
        );

        let history: Vec<Usage> = history
            .iter()
            .map(|usage| usage.in_timezone(&self.timezone))
            .collect();
        let at_time = at_time.with_timezone(&self.timezone).fixed_offset();

        let offending = self.policy.evaluate(at_time, &history)?;
        Ok(offending.cloned())
    }

    /// Record one usage, converting its timestamp to UTC before the
    /// write-through.
    pub async fn record_usage(
        &self,
        scope: impl ToString,
        identity: impl ToString,
        time: DateTime<impl TimeZone>,
        reference_id: Option<&str>,
        response_id: Option<&str>,
    ) -> Result<()> {
        let scope = scope.to_string();
        let identity = identity.to_string();
        let utc_time = time.with_timezone(&Utc);

        debug!(%scope, %identity, %utc_time, "recording usage");
        self.store
            .add_usage(&scope, &identity, utc_time, reference_id, response_id)
            .await
    }

    /// Drop records older than the configured retention period.
    ///
    /// Without a retention period this is a warning-level no-op: it signals
    /// misconfiguration, not failure.
    pub async fn run_housekeeping(&self) -> Result<()> {
        let Some(retention) = self.retention else {
            warn!("housekeeping triggered without a retention period; skipping");
            return Ok(());
        };

        let cutoff = Utc::now() - retention;
        debug!(%cutoff, "dropping usages older than cutoff");
        self.store.drop_older_than(cutoff).await
    }

    /// Release the underlying store's resources. Consumes the limiter, so
    /// it can only happen once.
    pub async fn close(self) -> Result<()> {
        self.store.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DailyLimitPolicy;
    use crate::store::MemoryUsageStore;
    use chrono_tz::America::New_York;
    use chrono_tz::Europe::Berlin;

    fn limiter(limit: usize) -> RateLimiter<MemoryUsageStore> {
        RateLimiter::new(DailyLimitPolicy::new(limit), MemoryUsageStore::new())
    }

    #[tokio::test]
    async fn test_no_usages_allows() {
        let limiter = limiter(1);
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let offending = limiter
            .check_offending_usage("scope", "identity", now)
            .await
            .unwrap();
        assert_eq!(offending, None);
    }

    #[tokio::test]
    async fn test_check_after_record_rejects() {
        let limiter = limiter(1);
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

        limiter
            .record_usage("scope", "identity", now, Some("ref-1"), None)
            .await
            .unwrap();

        let offending = limiter
            .check_offending_usage("scope", "identity", now + Duration::minutes(5))
            .await
            .unwrap()
            .expect("quota should be exhausted");
        assert_eq!(offending.reference_id.as_deref(), Some("ref-1"));
        // Surfaced in the operating zone
        assert_eq!(offending.time, now);
    }

    #[tokio::test]
    async fn test_numeric_keys_are_canonicalized() {
        let limiter = limiter(1);
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

        limiter
            .record_usage(42_u64, 7_i64, now, None, None)
            .await
            .unwrap();

        let offending = limiter
            .check_offending_usage("42", "7", now)
            .await
            .unwrap();
        assert!(offending.is_some());
    }

    #[tokio::test]
    async fn test_day_boundary_in_operating_zone() {
        // 22:30 UTC on July 14 is already July 15 in Berlin. A check at
        // 06:00 UTC on July 15 (08:00 Berlin) is the same Berlin day.
        let limiter = limiter(1);
        let recorded = Utc.with_ymd_and_hms(2024, 7, 14, 22, 30, 0).unwrap();
        let checked = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();

        limiter
            .record_usage("scope", "identity", recorded, None, None)
            .await
            .unwrap();

        let offending = limiter
            .check_offending_usage("scope", "identity", checked)
            .await
            .unwrap();
        assert!(offending.is_some());
    }

    #[tokio::test]
    async fn test_day_boundary_differs_by_operating_zone() {
        // The same instants land on different calendar days in New York:
        // 22:30 UTC on July 14 is 18:30 on July 14, while 06:00 UTC on
        // July 15 is 02:00 on July 15. Quota is available there.
        let limiter = limiter(1).with_timezone(New_York);
        let recorded = Utc.with_ymd_and_hms(2024, 7, 14, 22, 30, 0).unwrap();
        let checked = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();

        limiter
            .record_usage("scope", "identity", recorded, None, None)
            .await
            .unwrap();

        let offending = limiter
            .check_offending_usage("scope", "identity", checked)
            .await
            .unwrap();
        assert_eq!(offending, None);
    }

    #[tokio::test]
    async fn test_record_accepts_zoned_input() {
        let limiter = limiter(1);
        let local = Berlin.with_ymd_and_hms(2024, 7, 15, 14, 0, 0).unwrap();

        limiter
            .record_usage("scope", "identity", local, None, None)
            .await
            .unwrap();

        let offending = limiter
            .check_offending_usage("scope", "identity", local)
            .await
            .unwrap()
            .expect("same Berlin day");
        // Stored in UTC, same instant
        assert_eq!(offending.time, local);
    }

    #[tokio::test]
    async fn test_housekeeping_without_retention_is_noop() {
        let limiter = limiter(1);
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        limiter
            .record_usage("scope", "identity", now, None, None)
            .await
            .unwrap();

        limiter.run_housekeeping().await.unwrap();

        let offending = limiter
            .check_offending_usage("scope", "identity", now)
            .await
            .unwrap();
        assert!(offending.is_some(), "no records may be dropped");
    }

    #[tokio::test]
    async fn test_housekeeping_drops_expired_records() {
        let limiter = limiter(1).with_retention(Duration::days(7));
        let long_ago = Utc::now() - Duration::days(30);

        limiter
            .record_usage("scope", "identity", long_ago, None, None)
            .await
            .unwrap();
        limiter.run_housekeeping().await.unwrap();

        let offending = limiter
            .check_offending_usage("scope", "identity", Utc::now())
            .await
            .unwrap();
        assert_eq!(offending, None);
    }

    #[tokio::test]
    async fn test_close_releases_store() {
        let limiter = limiter(1);
        limiter.close().await.unwrap();
    }
}

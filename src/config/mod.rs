use crate::error::{RateLimitError, Result};
use crate::limiter::{RateLimiter, DEFAULT_TIMEZONE};
use crate::policy::DailyLimitPolicy;
use crate::store::UsageStore;
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Operating time zone for calendar-window decisions
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// Maximum number of actions per local calendar day
    pub daily_limit: usize,
    /// How long usage records are retained, in hours. Housekeeping is a
    /// warning-level no-op when unset.
    #[serde(default)]
    pub retention_hours: Option<i64>,
}

fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE
}

impl RateLimiterConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.daily_limit == 0 {
            return Err(RateLimitError::Config(
                "daily_limit must be at least 1".to_string(),
            ));
        }
        if let Some(hours) = self.retention_hours {
            if hours <= 0 {
                return Err(RateLimitError::Config(format!(
                    "retention_hours must be positive, got {hours}"
                )));
            }
        }
        Ok(())
    }

    /// Build a daily-limit rate limiter over the given store.
    pub fn build<S: UsageStore>(&self, store: S) -> Result<RateLimiter<S>> {
        self.validate()?;

        let mut limiter = RateLimiter::new(DailyLimitPolicy::new(self.daily_limit), store)
            .with_timezone(self.timezone);
        if let Some(hours) = self.retention_hours {
            limiter = limiter.with_retention(Duration::hours(hours));
        }
        Ok(limiter)
    }
}

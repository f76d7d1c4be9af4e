use super::RateLimitPolicy;
use crate::error::{RateLimitError, Result};
use crate::usage::Usage;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Quota of at most `limit` actions per local calendar day.
///
/// "Same day" is a pure calendar-date comparison in the zone the inputs were
/// converted into, not a 24-hour span: an action at 23:59 and one at 00:01
/// two minutes later fall on different days, while actions 23 hours apart can
/// share a day. Day boundaries follow the zone's offset transitions, so the
/// window shrinks or stretches across daylight-saving shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLimitPolicy {
    limit: usize,
}

impl DailyLimitPolicy {
    /// Create a policy allowing at most `limit` actions per calendar day.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The configured daily limit.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl RateLimitPolicy for DailyLimitPolicy {
    fn requested_history(&self) -> usize {
        self.limit
    }

    fn evaluate<'a>(
        &self,
        at_time: DateTime<FixedOffset>,
        history: &'a [Usage],
    ) -> Result<Option<&'a Usage>> {
        if history.len() > self.limit {
            return Err(RateLimitError::InvalidHistorySize {
                requested: self.limit,
                received: history.len(),
            });
        }

        let target_day = at_time.date_naive();
        let used_today = history
            .iter()
            .filter(|usage| usage.local_date() == target_day)
            .count();

        if used_today < self.limit {
            return Ok(None);
        }

        // The window is exhausted. The last element is the oldest of the
        // newest-first fetch, so it marks the boundary of the window and
        // drives any retry-after computation. Fetch order is authoritative
        // for records with equal timestamps.
        Ok(history.last())
    }
}

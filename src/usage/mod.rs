//! The usage record model
//!
//! A [`Usage`] is one recorded action by an identity within a scope. Records
//! are immutable once created: the limiter writes them through to storage and
//! policies only ever look at them.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// One recorded action: who did what, where, and when.
///
/// `time` always carries a zone offset. Converting a usage into another time
/// zone changes the zone-of-record only; the absolute instant is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Context/tenant the quota applies within
    pub scope: String,
    /// Principal being rate limited
    pub identity: String,
    /// When the action happened (zone-aware)
    pub time: DateTime<FixedOffset>,
    /// Caller-supplied correlation id
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Caller-supplied correlation id
    #[serde(default)]
    pub response_id: Option<String>,
}

impl Usage {
    /// Create a new usage record.
    ///
    /// `scope` and `identity` must be non-empty.
    pub fn new(
        scope: impl Into<String>,
        identity: impl Into<String>,
        time: DateTime<impl TimeZone>,
        reference_id: Option<String>,
        response_id: Option<String>,
    ) -> Self {
        let scope = scope.into();
        let identity = identity.into();
        debug_assert!(!scope.is_empty(), "usage scope must be non-empty");
        debug_assert!(!identity.is_empty(), "usage identity must be non-empty");

        Self {
            scope,
            identity,
            time: time.fixed_offset(),
            reference_id,
            response_id,
        }
    }

    /// Return a copy whose `time` is expressed in the given zone.
    ///
    /// Only the zone-of-record changes; the instant does not.
    pub fn in_timezone<Tz: TimeZone>(&self, tz: &Tz) -> Self {
        Self {
            time: self.time.with_timezone(tz).fixed_offset(),
            ..self.clone()
        }
    }

    /// The calendar date of this usage in its zone-of-record.
    pub fn local_date(&self) -> NaiveDate {
        self.time.date_naive()
    }
}

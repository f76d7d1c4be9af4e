//! Quota decision policies
//!
//! A policy is a pure decision function: given "now" and a bounded slice of
//! recent history, it decides whether a new attempt would exceed quota. It
//! never talks to storage itself; the [`RateLimiter`](crate::RateLimiter)
//! fetches exactly the history the policy asks for and converts everything
//! into the operating time zone before delegating.
//!
//! Additional quota shapes (sliding window, token bucket) are further
//! implementations of the same two-operation trait.

pub mod daily_limit;

pub use daily_limit::DailyLimitPolicy;

use crate::error::Result;
use crate::usage::Usage;
use chrono::{DateTime, FixedOffset};

/// Decision contract for quota policies.
///
/// Implementations must be pure: no I/O, no shared mutable state, safe to
/// call from any number of concurrent callers.
pub trait RateLimitPolicy: Send + Sync {
    /// The exact number of most-recent usages this policy needs to decide.
    ///
    /// Callers must never pass more history than this to
    /// [`evaluate`](RateLimitPolicy::evaluate).
    fn requested_history(&self) -> usize;

    /// Decide whether an attempt at `at_time` would exceed quota.
    ///
    /// `history` is ordered newest-first and must already be converted into
    /// the policy's operating time zone, as must `at_time`.
    ///
    /// Returns `Ok(None)` when quota is available, or `Ok(Some(usage))`
    /// naming the offending record — the boundary of the exhausted window,
    /// which callers can use to compute a retry-after time.
    ///
    /// # Errors
    ///
    /// Fails with [`RateLimitError::InvalidHistorySize`] when `history` holds
    /// more than [`requested_history`] records. That is a caller bug, not a
    /// business decision, and is enforced by every policy.
    ///
    /// [`RateLimitError::InvalidHistorySize`]: crate::error::RateLimitError::InvalidHistorySize
    /// [`requested_history`]: RateLimitPolicy::requested_history
    fn evaluate<'a>(
        &self,
        at_time: DateTime<FixedOffset>,
        history: &'a [Usage],
    ) -> Result<Option<&'a Usage>>;
}

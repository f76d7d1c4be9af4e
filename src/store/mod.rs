//! Usage persistence port
//!
//! The limiter talks to storage exclusively through [`UsageStore`]. Backends
//! are plain CRUD adapters with no decision logic; anything that blocks or
//! suspends (network, disk, pooling, timeouts) lives behind this trait.
//!
//! [`MemoryUsageStore`] is the in-process reference adapter. SQL-backed
//! adapters implement the same contract out of tree.

pub mod memory;

pub use memory::MemoryUsageStore;

use crate::error::Result;
use crate::usage::Usage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage contract for usage records, keyed by (scope, identity).
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Persist one usage record.
    ///
    /// # Errors
    ///
    /// Fails with [`RateLimitError::StorageUnavailable`] on I/O failure.
    ///
    /// [`RateLimitError::StorageUnavailable`]: crate::error::RateLimitError::StorageUnavailable
    async fn add_usage(
        &self,
        scope: &str,
        identity: &str,
        utc_time: DateTime<Utc>,
        reference_id: Option<&str>,
        response_id: Option<&str>,
    ) -> Result<()>;

    /// Fetch up to `limit` records for the pair, ordered strictly
    /// newest-first. Returns an empty vec when none exist; never returns
    /// more than `limit`. Ties between equal timestamps follow the
    /// backend's fetch order.
    async fn get_usages(&self, scope: &str, identity: &str, limit: usize) -> Result<Vec<Usage>>;

    /// Delete every record with `time < cutoff`, across all scopes and
    /// identities.
    async fn drop_older_than(&self, cutoff: DateTime<Utc>) -> Result<()>;

    /// Release backend resources.
    async fn close(&self) -> Result<()>;
}

use super::UsageStore;
use crate::error::Result;
use crate::usage::Usage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

/// In-memory usage store.
///
/// Keeps full history per (scope, identity) pair in insertion order. Reads
/// sort newest-first with a stable sort, so records with equal timestamps
/// keep their insertion order within the result.
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    usages: DashMap<(String, String), Vec<Usage>>,
}

impl MemoryUsageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all pairs (for tests/monitoring).
    pub fn len(&self) -> usize {
        self.usages.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether the store holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn add_usage(
        &self,
        scope: &str,
        identity: &str,
        utc_time: DateTime<Utc>,
        reference_id: Option<&str>,
        response_id: Option<&str>,
    ) -> Result<()> {
        let usage = Usage::new(
            scope,
            identity,
            utc_time,
            reference_id.map(str::to_string),
            response_id.map(str::to_string),
        );
        self.usages
            .entry((scope.to_string(), identity.to_string()))
            .or_default()
            .push(usage);

        debug!(scope, identity, "inserted usage");
        Ok(())
    }

    async fn get_usages(&self, scope: &str, identity: &str, limit: usize) -> Result<Vec<Usage>> {
        let key = (scope.to_string(), identity.to_string());
        let mut usages = self
            .usages
            .get(&key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        usages.sort_by(|a, b| b.time.cmp(&a.time));
        usages.truncate(limit);

        debug!(
            scope,
            identity,
            count = usages.len(),
            limit,
            "fetched usages"
        );
        Ok(usages)
    }

    async fn drop_older_than(&self, cutoff: DateTime<Utc>) -> Result<()> {
        let cutoff = cutoff.fixed_offset();
        for mut entry in self.usages.iter_mut() {
            entry.value_mut().retain(|usage| usage.time >= cutoff);
        }
        self.usages.retain(|_, usages| !usages.is_empty());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

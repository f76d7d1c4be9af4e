//! Calendar-window usage quota enforcement
//!
//! This crate records each action an identity performs within a scope and
//! consults a pluggable policy on every new attempt:
//!
//! - **`Usage`**: immutable record of one action (who, where, when)
//! - **`RateLimitPolicy`**: pure decision over a bounded slice of history
//! - **`DailyLimitPolicy`**: at most N actions per local calendar day
//! - **`UsageStore`**: persistence port; `MemoryUsageStore` ships in-crate
//! - **`RateLimiter`**: orchestrator that normalizes time zones, bounds
//!   history fetches, and wires decisions to persistence
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use usage_limiter::{DailyLimitPolicy, MemoryUsageStore, RateLimiter};
//!
//! #[tokio::main]
//! async fn main() -> usage_limiter::Result<()> {
//!     let limiter = RateLimiter::new(DailyLimitPolicy::new(1), MemoryUsageStore::new());
//!
//!     let now = Utc::now();
//!     assert!(limiter.check_offending_usage("my-app", "user-1", now).await?.is_none());
//!     limiter.record_usage("my-app", "user-1", now, None, None).await?;
//!
//!     // Second attempt on the same calendar day is rejected; the returned
//!     // usage marks the window boundary for a retry-after computation.
//!     let offending = limiter.check_offending_usage("my-app", "user-1", now).await?;
//!     assert!(offending.is_some());
//!     limiter.close().await
//! }
//! ```
//!
//! Checking and recording are not transactional; see the [`limiter`] module
//! docs for the concurrency model.

pub mod config;
pub mod error;
pub mod limiter;
pub mod policy;
pub mod store;
pub mod usage;

pub use config::RateLimiterConfig;
pub use error::{RateLimitError, Result};
pub use limiter::{RateLimiter, DEFAULT_TIMEZONE};
pub use policy::{DailyLimitPolicy, RateLimitPolicy};
pub use store::{MemoryUsageStore, UsageStore};
pub use usage::Usage;

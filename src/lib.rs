//! ratelimit-stats - usage reporting for a Redis-backed rate limiter
//!
//! This library reads the request logs and manual blocks a sliding window
//! rate limiter keeps in Redis and summarises them: request counts per
//! identifier over the last 5 minutes, 15 minutes, hour and day, and the
//! blocks currently in force with their remaining time.

pub mod config;
pub mod error;
pub mod output;
pub mod stats;
pub mod store;

#[cfg(test)]
mod log_capture;

pub use crate::config::{Config, OutputFormat};
pub use crate::error::{StatsError, StatsResult};
pub use crate::stats::{run_passes, BlockReport, PassOptions, PassResults, RateLimitReport};
pub use crate::store::{RedisStore, StatsStore};

#[cfg(any(test, feature = "test-utils"))]
pub use crate::store::InMemoryStore;

//! Common test utilities for ratelimit-stats
//!
//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ratelimit_stats::{store::keys, InMemoryStore, StatsResult, StatsStore};

/// Test configuration constants
pub mod constants {
    /// Namespace used by the rate limiter by default
    pub const NAMESPACE: &str = "ratelimiter:";
}

/// Seconds since the epoch, `ago` seconds before now
pub fn seconds_ago(now: f64, ago: f64) -> String {
    format!("{:.6}", now - ago)
}

/// Seed a request log the way the rate limiter writes it: newest first
pub fn seed_log(store: &InMemoryStore, identifier: &str, now: f64, ages: &[f64]) {
    let key = keys::log_key(constants::NAMESPACE, identifier);
    let mut ages = ages.to_vec();
    ages.sort_by(|a, b| b.total_cmp(a));
    for age in ages {
        store.lpush(&key, &seconds_ago(now, age));
    }
}

/// Seed a manual block with a TTL, `None` for a block in its final second
pub fn seed_block(store: &InMemoryStore, identifier: &str, ttl: Option<u64>) {
    let key = keys::block_key(constants::NAMESPACE, identifier);
    store.set(&key, "1", ttl);
}

/// Store wrapper that fails every command touching keys matching a marker
pub struct FailingStore {
    pub inner: InMemoryStore,
    pub fail_on: &'static str,
}

impl FailingStore {
    fn check(&self, key: &str) -> StatsResult<()> {
        if key.contains(self.fail_on) {
            return Err(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection reset by peer",
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl StatsStore for FailingStore {
    async fn keys(&self, pattern: &str) -> StatsResult<Vec<String>> {
        self.check(pattern)?;
        self.inner.keys(pattern).await
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StatsResult<Vec<String>> {
        self.check(key)?;
        self.inner.lrange(key, start, stop).await
    }

    async fn ttl(&self, key: &str) -> StatsResult<Option<u64>> {
        self.check(key)?;
        self.inner.ttl(key).await
    }
}

//! Store module
//!
//! The reporting passes only ever read from the store. `StatsStore` is the
//! narrow client contract they depend on: key enumeration, list ranges and
//! expiry queries.

pub mod keys;
pub mod redis;

#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;

use async_trait::async_trait;

use crate::error::StatsResult;

pub use self::redis::RedisStore;

#[cfg(any(test, feature = "test-utils"))]
pub use self::in_memory::InMemoryStore;

/// Read-only key-value store client used by the reporting passes
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// List all keys matching a glob pattern (Redis `KEYS` semantics)
    async fn keys(&self, pattern: &str) -> StatsResult<Vec<String>>;

    /// Fetch a range of a list value, inclusive, negative indices count from the end
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StatsResult<Vec<String>>;

    /// Remaining time to live in seconds
    ///
    /// Returns `None` when the store cannot report one: the key is in its
    /// final second, has no expiry or no longer exists.
    async fn ttl(&self, key: &str) -> StatsResult<Option<u64>>;
}

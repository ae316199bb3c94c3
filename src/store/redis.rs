//! Redis store implementation
//!
//! Thin read-only wrapper over a Redis connection manager.

use async_trait::async_trait;
use redis::AsyncCommands;

use super::StatsStore;
use crate::error::StatsResult;

/// Redis-backed store
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Wrap an existing connection manager
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a connection manager for a Redis URL or connection parameters
    pub async fn connect<T: redis::IntoConnectionInfo>(params: T) -> StatsResult<Self> {
        let client = redis::Client::open(params)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl StatsStore for RedisStore {
    async fn keys(&self, pattern: &str) -> StatsResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StatsResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let values: Vec<String> = conn.lrange(key, start, stop).await?;
        Ok(values)
    }

    async fn ttl(&self, key: &str) -> StatsResult<Option<u64>> {
        let mut conn = self.conn.clone();
        // 0 is the final second, -1 means no expiry, -2 means the key is gone
        let ttl: i64 = conn.ttl(key).await?;
        Ok(u64::try_from(ttl).ok().filter(|ttl| *ttl > 0))
    }
}

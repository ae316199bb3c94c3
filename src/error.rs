//! Error types for ratelimit-stats
//!
//! Both reporting passes return `StatsResult`; nothing in here is handled
//! inside a pass, the caller decides what to do with a failed pass.

use thiserror::Error;

/// Errors raised while reading or reporting on rate limiter state
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Malformed key {key:?}: expected {expected}")]
    MalformedKey { key: String, expected: String },

    #[error("Malformed timestamp {value:?} in {key}")]
    MalformedTimestamp { key: String, value: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type StatsResult<T> = Result<T, StatsError>;

//! Pass isolation tests
//!
//! A store failure or bad data in one pass must leave the other pass's
//! report intact.

use ratelimit_stats::{run_passes, InMemoryStore, PassOptions, StatsError};

use crate::common::{constants::NAMESPACE, seed_block, seed_log, FailingStore};

fn options() -> PassOptions {
    PassOptions {
        namespace: NAMESPACE.to_string(),
        min_daily_count: None,
        rate_limits: true,
        manual_blocks: true,
    }
}

#[tokio::test]
async fn test_rate_limit_failure_keeps_blocks() {
    let inner = InMemoryStore::new();
    seed_log(&inner, "api", 1_700_000_000.0, &[1.0]);
    seed_block(&inner, "api", Some(30));
    let store = FailingStore {
        inner,
        fail_on: ":log",
    };

    let results = run_passes(&store, &options()).await;

    assert!(matches!(
        results.rate_limits,
        Some(Err(StatsError::RedisError(_)))
    ));
    let blocks = results.manual_blocks.unwrap().unwrap();
    assert_eq!(blocks.blocks.len(), 1);
    assert_eq!(blocks.blocks[0].remaining_seconds, 30);
}

#[tokio::test]
async fn test_block_failure_keeps_rate_limits() {
    let inner = InMemoryStore::new();
    seed_log(&inner, "api", 1_700_000_000.0, &[1.0]);
    seed_block(&inner, "api", Some(30));
    let store = FailingStore {
        inner,
        fail_on: ":block",
    };

    let results = run_passes(&store, &options()).await;

    assert!(!results.all_succeeded());
    assert_eq!(results.errors().count(), 1);
    let report = results.rate_limits.unwrap().unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(results.manual_blocks.unwrap().is_err());
}

#[tokio::test]
async fn test_malformed_timestamp_keeps_blocks() {
    let store = InMemoryStore::new();
    store.set_list("ratelimiter:api:log", ["garbage"]);
    seed_block(&store, "api", Some(5));

    let results = run_passes(&store, &options()).await;

    assert!(matches!(
        results.rate_limits,
        Some(Err(StatsError::MalformedTimestamp { .. }))
    ));
    assert!(results.manual_blocks.unwrap().is_ok());
}

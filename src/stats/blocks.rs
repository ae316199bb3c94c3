//! Manual block report
//!
//! Lists blocks an operator placed on an identifier, with the time left
//! before Redis expires them.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    error::StatsResult,
    store::{keys, StatsStore},
};

/// Remaining time reported for a block with less than a second left
///
/// Redis answers `TTL` with 0 for a key in the last second of its life, and
/// the block may expire between `KEYS` and `TTL`.
pub const FINAL_SECOND_TTL: u64 = 1;

/// An active manual block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockEntry {
    pub key: String,
    /// Seconds until the block expires
    pub remaining_seconds: u64,
}

impl BlockEntry {
    /// Remaining time as `HH:MM:SS`
    pub fn remaining(&self) -> String {
        format_remaining(self.remaining_seconds)
    }
}

/// Result of a manual block pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlockReport {
    /// Active blocks, soonest to expire first
    pub blocks: Vec<BlockEntry>,
}

impl BlockReport {
    /// Header line of the block table
    pub fn header(&self) -> &'static str {
        "block_key    hours:minutes:seconds remaining"
    }

    /// One line per block
    pub fn lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|block| format!("{}\t\t{}", block.key, block.remaining()))
            .collect()
    }

    /// Emit the report through tracing
    pub fn log(&self) {
        if self.blocks.is_empty() {
            return;
        }
        debug!(target: "ratelimit_stats::blocks", "{}", self.header());
        for line in self.lines() {
            info!(target: "ratelimit_stats::blocks", "{}", line);
        }
    }
}

/// Format a duration in seconds as `HH:MM:SS`
///
/// Hours are not wrapped at 24 and widen past two digits when needed.
pub fn format_remaining(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Gather every active manual block in `namespace`
#[instrument(skip(store))]
pub async fn collect_manual_blocks(
    store: &dyn StatsStore,
    namespace: &str,
) -> StatsResult<BlockReport> {
    let block_keys = store.keys(&keys::block_pattern(namespace)).await?;

    let mut blocks = Vec::with_capacity(block_keys.len());
    for whole_key in &block_keys {
        let remaining_seconds = store
            .ttl(whole_key)
            .await?
            .unwrap_or(FINAL_SECOND_TTL)
            .max(FINAL_SECOND_TTL);
        let key = keys::parse_identifier(namespace, keys::BLOCK_SUFFIX, whole_key)?;
        blocks.push(BlockEntry {
            key: key.to_string(),
            remaining_seconds,
        });
    }

    blocks.sort_by(|a, b| {
        a.remaining_seconds
            .cmp(&b.remaining_seconds)
            .then_with(|| a.key.cmp(&b.key))
    });

    debug!(blocks = blocks.len(), "manual blocks gathered");

    Ok(BlockReport { blocks })
}

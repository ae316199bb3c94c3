//! Reporting passes
//!
//! Two independent passes read the rate limiter's state: request usage per
//! identifier and active manual blocks. A failure in one never stops the
//! other from running.

pub mod blocks;
pub mod ratelimiter;
pub mod windows;

use tracing::instrument;

use crate::{
    error::{StatsError, StatsResult},
    store::StatsStore,
};

pub use self::blocks::{collect_manual_blocks, format_remaining, BlockEntry, BlockReport};
pub use self::ratelimiter::{collect_rate_limit_stats, RateLimitEntry, RateLimitReport};
pub use self::windows::{Window, WindowCounts};

/// Which passes to run and how
#[derive(Debug, Clone)]
pub struct PassOptions {
    pub namespace: String,
    pub min_daily_count: Option<u64>,
    pub rate_limits: bool,
    pub manual_blocks: bool,
}

/// Outcome of each pass, `None` when the pass was not requested
#[derive(Debug)]
pub struct PassResults {
    pub rate_limits: Option<StatsResult<RateLimitReport>>,
    pub manual_blocks: Option<StatsResult<BlockReport>>,
}

impl PassResults {
    /// Errors of the passes that failed
    pub fn errors(&self) -> impl Iterator<Item = &StatsError> + '_ {
        let rate_limits = self.rate_limits.as_ref().and_then(|r| r.as_ref().err());
        let manual_blocks = self.manual_blocks.as_ref().and_then(|r| r.as_ref().err());
        rate_limits.into_iter().chain(manual_blocks)
    }

    /// Whether every requested pass succeeded
    pub fn all_succeeded(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Current wall clock time in fractional seconds since the epoch
pub fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Run the requested passes one after the other
///
/// Each pass reads the clock when it starts.
#[instrument(skip(store))]
pub async fn run_passes(store: &dyn StatsStore, options: &PassOptions) -> PassResults {
    let rate_limits = if options.rate_limits {
        Some(
            collect_rate_limit_stats(
                store,
                &options.namespace,
                options.min_daily_count,
                now_seconds(),
            )
            .await,
        )
    } else {
        None
    };

    let manual_blocks = if options.manual_blocks {
        Some(collect_manual_blocks(store, &options.namespace).await)
    } else {
        None
    };

    PassResults {
        rate_limits,
        manual_blocks,
    }
}

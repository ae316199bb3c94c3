//! Rate limiter usage report
//!
//! Walks every request log in a namespace and buckets each logged request
//! into the 5m / 15m / 1h / 1d windows.
//!
//! Request logs the rate limiter has already expired or trimmed are not seen
//! here, so the one day column undercounts whenever the limiter keeps its
//! logs for less than a day.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::windows::{Window, WindowCounts};
use crate::{
    error::{StatsError, StatsResult},
    store::{keys, StatsStore},
};

/// Log a progress line every this many keys
const PROGRESS_INTERVAL: usize = 1000;

/// Request counts for one rate limited identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitEntry {
    pub key: String,
    #[serde(flatten)]
    pub counts: WindowCounts,
}

/// Result of a rate limiter pass
#[derive(Debug, Clone)]
pub struct RateLimitReport {
    /// Every identifier seen, least busy first
    pub entries: Vec<RateLimitEntry>,
    /// Hide identifiers with fewer daily requests than this
    pub min_daily_count: Option<u64>,
    /// Sums over all identifiers
    pub totals: WindowCounts,
}

impl RateLimitReport {
    /// Entries passing the minimum daily count filter
    pub fn visible_entries(&self) -> impl Iterator<Item = &RateLimitEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| match self.min_daily_count {
                Some(min) => entry.counts.one_day >= min,
                None => true,
            })
    }

    /// Column width for identifiers, over all entries whether visible or not
    pub fn key_width(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.key.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Header line of the per key table
    pub fn keys_header(&self) -> String {
        let columns: Vec<String> = Window::ALL
            .iter()
            .map(|w| format!("{:>5}", w.label()))
            .collect();
        format!("{:<width$}\t{}", "key", columns.join("\t"), width = self.key_width())
    }

    /// One line per visible entry
    pub fn key_lines(&self) -> Vec<String> {
        let width = self.key_width();
        self.visible_entries()
            .map(|entry| {
                format!(
                    "({:<width$})\t{}",
                    entry.key,
                    count_columns(&entry.counts),
                    width = width
                )
            })
            .collect()
    }

    /// Header line of the totals table
    pub fn totals_header(&self) -> String {
        Window::ALL
            .iter()
            .map(|w| format!("{:>5}", w.label()))
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Totals line
    pub fn totals_line(&self) -> String {
        count_columns(&self.totals)
    }

    /// Emit the report through tracing
    pub fn log(&self) {
        if !self.entries.is_empty() {
            debug!(target: "ratelimit_stats::ratelimiter::keys", "{}", self.keys_header());
            for line in self.key_lines() {
                info!(target: "ratelimit_stats::ratelimiter::keys", "{}", line);
            }
        }

        debug!(target: "ratelimit_stats::ratelimiter::totals", "{}", self.totals_header());
        info!(target: "ratelimit_stats::ratelimiter::totals", "{}", self.totals_line());
    }
}

fn count_columns(counts: &WindowCounts) -> String {
    Window::ALL
        .iter()
        .map(|w| format!("{:>5}", counts.get(*w)))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Gather request counts for every request log in `namespace`
///
/// `now` is the reference time in fractional seconds since the epoch.
/// Store errors and unparseable timestamps abort the pass.
#[instrument(skip(store))]
pub async fn collect_rate_limit_stats(
    store: &dyn StatsStore,
    namespace: &str,
    min_daily_count: Option<u64>,
    now: f64,
) -> StatsResult<RateLimitReport> {
    let log_keys = store.keys(&keys::log_pattern(namespace)).await?;
    let total_keys = log_keys.len();

    let mut per_key: HashMap<String, WindowCounts> = HashMap::with_capacity(total_keys);
    let mut totals = WindowCounts::default();

    for (i, whole_key) in log_keys.iter().enumerate() {
        let processed = i + 1;
        if processed % PROGRESS_INTERVAL == 0 {
            debug!("gathering stats ({} / {})", processed, total_keys);
        }

        let key = keys::parse_identifier(namespace, keys::LOG_SUFFIX, whole_key)?;
        let counts = per_key.entry(key.to_string()).or_default();

        for value in store.lrange(whole_key, 0, -1).await? {
            let requested_at: f64 = value.trim().parse().map_err(|_| StatsError::MalformedTimestamp {
                key: whole_key.clone(),
                value: value.clone(),
            })?;
            let elapsed = now - requested_at;
            counts.record(elapsed);
            totals.record(elapsed);
        }
    }

    let mut entries: Vec<RateLimitEntry> = per_key
        .into_iter()
        .map(|(key, counts)| RateLimitEntry { key, counts })
        .collect();
    entries.sort_by(|a, b| {
        a.counts
            .sort_key()
            .cmp(&b.counts.sort_key())
            .then_with(|| a.key.cmp(&b.key))
    });

    debug!(keys = entries.len(), "rate limiter stats gathered");

    Ok(RateLimitReport {
        entries,
        min_daily_count,
        totals,
    })
}

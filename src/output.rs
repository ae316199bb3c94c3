//! Report output
//!
//! Text reports go through tracing so they share the log format; JSON reports
//! are rendered as one document.

use serde::Serialize;
use tracing::error;

use crate::{
    config::OutputFormat,
    error::StatsResult,
    stats::{BlockReport, PassResults, RateLimitEntry, RateLimitReport, WindowCounts},
};

/// JSON view of the rate limiter pass
#[derive(Debug, Serialize)]
struct RateLimitJson<'a> {
    keys: Vec<&'a RateLimitEntry>,
    totals: WindowCounts,
}

impl<'a> From<&'a RateLimitReport> for RateLimitJson<'a> {
    fn from(report: &'a RateLimitReport) -> Self {
        Self {
            keys: report.visible_entries().collect(),
            totals: report.totals,
        }
    }
}

/// A pass in JSON: its report, or the error that stopped it
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PassJson<T> {
    Report(T),
    Failed { error: String },
}

impl<T> PassJson<T> {
    fn new<'r, R>(result: &'r StatsResult<R>, view: impl FnOnce(&'r R) -> T) -> Self {
        match result {
            Ok(report) => PassJson::Report(view(report)),
            Err(err) => PassJson::Failed {
                error: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ResultsJson<'a> {
    ratelimits: Option<PassJson<RateLimitJson<'a>>>,
    blocks: Option<PassJson<&'a BlockReport>>,
}

/// Render pass results as a pretty JSON document
///
/// Suppressed passes are `null`, failed passes carry an `error` string.
pub fn render_json(results: &PassResults) -> StatsResult<String> {
    let document = ResultsJson {
        ratelimits: results
            .rate_limits
            .as_ref()
            .map(|result| PassJson::new(result, RateLimitJson::from)),
        blocks: results
            .manual_blocks
            .as_ref()
            .map(|result| PassJson::new(result, |report| report)),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Log the text report of every pass that succeeded and the error of every
/// pass that failed
pub fn log_text(results: &PassResults) {
    match &results.rate_limits {
        Some(Ok(report)) => report.log(),
        Some(Err(err)) => error!(error = %err, "rate limiter stats failed"),
        None => {}
    }

    match &results.manual_blocks {
        Some(Ok(report)) => report.log(),
        Some(Err(err)) => error!(error = %err, "manual block stats failed"),
        None => {}
    }
}

/// Write pass results in the requested format
pub fn emit(results: &PassResults, format: OutputFormat) -> StatsResult<()> {
    match format {
        OutputFormat::Text => log_text(results),
        OutputFormat::Json => {
            // failures still go to the log so they are not lost in the document
            for err in results.errors() {
                error!(error = %err, "pass failed");
            }
            println!("{}", render_json(results)?);
        }
    }
    Ok(())
}

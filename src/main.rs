//! ratelimit-stats - report on a running rate limiter
//!
//! This is the command line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use ratelimit_stats::{output, run_passes, Config, OutputFormat, RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::parse();

    // JSON reports own stdout, logs move to stderr
    let writer = match config.format {
        OutputFormat::Text => BoxMakeWriter::new(std::io::stdout),
        OutputFormat::Json => BoxMakeWriter::new(std::io::stderr),
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratelimit_stats=debug".into()),
        )
        .with_target(true)
        .with_writer(writer)
        .init();

    info!(redis = %config.redacted_redis_url(), namespace = %config.namespace, "Gathering rate limiter stats");

    let connection_info = config
        .connection_info()
        .context("Invalid Redis connection settings")?;
    let store = RedisStore::connect(connection_info)
        .await
        .with_context(|| format!("Failed to connect to {}", config.redacted_redis_url()))?;

    let results = run_passes(&store, &config.pass_options()).await;
    output::emit(&results, config.format)?;

    Ok(())
}

//! Configuration management for ratelimit-stats
//!
//! Configuration comes from command line flags, most of which fall back to
//! environment variables (a `.env` file is loaded first by the binary).

use clap::{Parser, ValueEnum};
use redis::{ConnectionInfo, IntoConnectionInfo};

use crate::stats::PassOptions;

/// How reports are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab separated tables through the log output
    Text,
    /// A single JSON document on stdout
    Json,
}

/// Application configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "ratelimit-stats", version, about = "RateLimiter Stats")]
pub struct Config {
    /// Redis server host
    #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
    pub host: String,

    /// Redis server port
    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub port: u16,

    /// Redis database index
    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    pub db: i64,

    /// Redis password
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Full Redis connection URL, overrides host, port, db and password
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Rate limiter key namespace
    #[arg(long, env = "RATELIMITER_NAMESPACE", default_value = "ratelimiter:")]
    pub namespace: String,

    /// Hide stats on rate limited requests
    #[arg(short = 'r', long = "hide-ratelimit-stats")]
    pub hide_ratelimit: bool,

    /// Hide stats on manually blocked keys
    #[arg(short = 'b', long = "hide-manual-blocks")]
    pub hide_manual_blocks: bool,

    /// Hide keys with a daily request count below N
    #[arg(short = 'c', long, value_name = "N")]
    pub min_daily_count: Option<u64>,

    /// Report output format
    #[arg(long, env = "RATELIMIT_STATS_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Config {
    /// Redis connection parameters
    ///
    /// `--redis-url` wins when given, otherwise host, port, db and password
    /// are used as they are, with no URL escaping involved.
    pub fn connection_info(&self) -> redis::RedisResult<ConnectionInfo> {
        if let Some(url) = &self.redis_url {
            return url.as_str().into_connection_info();
        }

        let mut info = (self.host.as_str(), self.port).into_connection_info()?;
        info.redis.db = self.db;
        info.redis.password = self.password.clone();
        Ok(info)
    }

    /// Redis URL safe for logging
    pub fn redacted_redis_url(&self) -> String {
        if self.redis_url.is_some() {
            // a user supplied URL may carry credentials anywhere
            return "<REDIS_URL>".to_string();
        }
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    /// Which reporting passes to run
    pub fn pass_options(&self) -> PassOptions {
        PassOptions {
            namespace: self.namespace.clone(),
            min_daily_count: self.min_daily_count.filter(|min| *min > 0),
            rate_limits: !self.hide_ratelimit,
            manual_blocks: !self.hide_manual_blocks,
        }
    }
}

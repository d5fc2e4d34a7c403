/// Worker configuration
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `RUN_MIGRATIONS`: apply migrations on startup (default: true)
/// - `WORKER_POLL_INTERVAL_SECS`: delay between sweeps (default: 5)
/// - `WORKER_STALE_AFTER_SECS`: age of an abandoned task (default: 300)
/// - `WORKER_BATCH_SIZE`: tasks per sweep (default: 10)
/// - `LOG_FORMAT`: `text` or `json` (default: text)
/// - analyzer variables, see [`AnalyzerConfig`]

use crate::analyzer::AnalyzerConfig;
use crate::recovery::RecoveryConfig;
use anyhow::Context;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub json_logs: bool,
    pub analyzer: AnalyzerConfig,
    pub recovery: RecoveryConfig,
}

impl WorkerConfig {
    /// Loads configuration from the process environment and `.env`
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RecoveryConfig::default();

        let recovery = RecoveryConfig {
            poll_interval: Duration::from_secs(parse_or(
                &lookup,
                "WORKER_POLL_INTERVAL_SECS",
                defaults.poll_interval.as_secs(),
            )?),
            stale_after: Duration::from_secs(parse_or(
                &lookup,
                "WORKER_STALE_AFTER_SECS",
                defaults.stale_after.as_secs(),
            )?),
            batch_size: parse_or(&lookup, "WORKER_BATCH_SIZE", defaults.batch_size)?,
        };

        Ok(WorkerConfig {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            analyzer: AnalyzerConfig::from_lookup(&lookup)?,
            recovery,
        })
    }
}

/// Parses `key` when set, otherwise returns `default`
pub fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} '{raw}': {e}")),
        None => Ok(default),
    }
}

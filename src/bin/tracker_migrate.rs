//! Applies pending task tracker schema migrations.
//!
//! Usage:
//!
//! ```text
//! tracker-migrate
//! ```
//!
//! Store settings are layered by `ortho_config`: a `.task_tracker.toml`
//! file (or the file named by `TASK_TRACKER_CONFIG_PATH`), then
//! `TASK_TRACKER_DATABASE_URL`, `TASK_TRACKER_MAX_POOL_SIZE` and
//! `TASK_TRACKER_CONNECTION_TIMEOUT_SECS`, then command-line flags:
//!
//! ```toml
//! database_url = "postgres://tracker@localhost/tracker"
//! max_pool_size = 4
//! connection_timeout_secs = 10
//! ```
//!
//! Log output honours `RUST_LOG`.

use std::env;
use std::process::ExitCode;
use task_tracker::config::{ConfigError, StoreConfig};
use task_tracker::task::adapters::postgres::PostgresTaskStore;
use task_tracker::task::ports::TaskStoreError;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Error)]
enum MigrateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = fmt().with_env_filter(filter).try_init() {
        warn!(error = %err, "tracing init failed");
    }

    match run() {
        Ok(applied) => {
            info!(applied, "migrations complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "migration failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<usize, MigrateError> {
    let config = load_config()?;
    let store = PostgresTaskStore::connect(&config)?;
    Ok(store.run_migrations()?)
}

fn load_config() -> Result<StoreConfig, MigrateError> {
    let config = StoreConfig::discover(env::args_os())?;
    info!(
        max_pool_size = config.max_pool_size(),
        "loaded store configuration"
    );
    Ok(config)
}

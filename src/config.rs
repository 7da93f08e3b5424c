//! Entity store configuration loaded via `OrthoConfig`.
//!
//! Settings are layered from configuration files, `TASK_TRACKER_*`
//! environment variables and command-line flags. Unset optional values fall
//! back to the defaults below.

use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoError};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MAX_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// A setting holds an unusable value.
    #[error("invalid value '{value}' for {name}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// The configuration layers could not be merged.
    #[error("failed to load store configuration: {0}")]
    Load(#[source] Arc<OrthoError>),
    /// The JSON document is malformed.
    #[error("failed to parse store configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Connection settings for the `PostgreSQL` entity store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASK_TRACKER")]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL.
    database_url: String,
    /// Maximum number of pooled connections.
    #[ortho_config(default = 10)]
    #[serde(default = "default_max_pool_size")]
    max_pool_size: u32,
    /// Connection checkout timeout in seconds.
    #[ortho_config(default = 30)]
    #[serde(default = "default_connection_timeout_secs")]
    connection_timeout_secs: u64,
}

const fn default_max_pool_size() -> u32 {
    DEFAULT_MAX_POOL_SIZE
}

const fn default_connection_timeout_secs() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

impl StoreConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Loads the layered configuration for a process invoked with `args`.
    ///
    /// The first argument is the program name, as with
    /// [`std::env::args_os`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when the layers cannot be merged, and
    /// [`ConfigError::Missing`] or [`ConfigError::Invalid`] when the merged
    /// settings are unusable.
    pub fn discover(args: impl IntoIterator<Item = OsString>) -> Result<Self, ConfigError> {
        Self::load_from_iter(args)
            .map_err(ConfigError::Load)?
            .validated()
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, and
    /// [`ConfigError::Missing`] or [`ConfigError::Invalid`] when the settings
    /// are unusable.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Missing("database_url"));
        }
        if self.max_pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "max_pool_size",
                value: self.max_pool_size.to_string(),
            });
        }
        Ok(self)
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    /// Returns how long a connection checkout may wait.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

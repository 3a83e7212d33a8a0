//! Logging configuration and tracing subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::ConfigError;

/// Environment variable holding a full `EnvFilter` directive; wins over `logging.level`.
pub const LOG_ENV_VAR: &str = "SCHOOL_LOG";

fn default_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Fallback filter directive, e.g. `"info"` or `"school_db=debug"`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    /// Build the filter: `SCHOOL_LOG` if set and valid, otherwise `level`.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global `fmt` subscriber.
///
/// # Errors
///
/// Returns `ConfigError::Tracing` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .try_init()
        .map_err(|error| ConfigError::Tracing(error.to_string()))
}

/// Install a subscriber that writes through the test harness's captured output.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(LoggingConfig::default().env_filter())
        .with_test_writer()
        .try_init();
}

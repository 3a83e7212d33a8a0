//! # school-config
//!
//! Layered configuration loading for the school curriculum store using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCHOOL_*` prefix, `__` as separator)
//! 2. Project-level `.school/config.toml`
//! 3. User-level `~/.config/school/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SCHOOL_DATABASE__PATH` -> `database.path` and
//! `SCHOOL_LOGGING__LEVEL` -> `logging.level`.
//!
//! # Usage
//!
//! ```no_run
//! use school_config::SchoolConfig;
//!
//! let config = SchoolConfig::load_with_dotenv().expect("config");
//! school_config::init_tracing(&config.logging).expect("tracing");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod logging;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use logging::{LOG_ENV_VAR, LoggingConfig, init_test_tracing, init_tracing};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchoolConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SchoolConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.database.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or the result is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".school/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SCHOOL_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("school").join("config.toml"))
    }

    /// Load `.env` from the workspace root, falling back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = SchoolConfig::default();
        assert_eq!(config.database.path, ".school/school.db");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn figment_builds_without_files() {
        let config: SchoolConfig = SchoolConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert!(!config.database.path.is_empty());
    }
}

//! Database location configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Path used when nothing else is configured.
fn default_path() -> String {
    ".school/school.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// libSQL database file, or `:memory:` for a throwaway store.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the store lives only for the lifetime of the connection.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// Reject configurations that cannot be opened.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the path is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_project_local_file() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".school/school.db");
        assert!(!config.is_in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_path_is_invalid() {
        let config = DatabaseConfig { path: "  ".into() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn memory_path_detected() {
        let config = DatabaseConfig {
            path: ":memory:".into(),
        };
        assert!(config.is_in_memory());
    }
}

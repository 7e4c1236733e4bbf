//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration and the employee roster from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, RosterConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── payroll.yaml   # Server and payroll settings (required)
/// └── roster.yaml    # Employees and attendance facts (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Binding to {}", loader.config().server.bind_address);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
    roster: RosterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if `payroll.yaml` is missing
    /// - [`EngineError::ConfigParseError`] if either file contains invalid YAML
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<EngineConfig>(&path.join("payroll.yaml"))?;

        let roster_path = path.join("roster.yaml");
        let roster = if roster_path.exists() {
            Self::load_yaml::<RosterConfig>(&roster_path)?
        } else {
            RosterConfig::default()
        };

        Ok(Self { config, roster })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the employee roster.
    pub fn roster(&self) -> &RosterConfig {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkingDaysPolicy;

    fn config_path() -> &'static str {
        "./config"
    }

    #[test]
    fn test_load_bundled_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert!(loader.config().payroll.reject_overlapping_structures);
        assert_eq!(
            loader.config().payroll.working_days,
            WorkingDaysPolicy::Fixed { days: 22 }
        );
        assert!(!loader.roster().employees.is_empty());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_loader_has_empty_roster() {
        let loader = ConfigLoader::default();
        assert!(loader.roster().employees.is_empty());
        assert_eq!(loader.config().server.bind_address, "127.0.0.1:3000");
    }
}

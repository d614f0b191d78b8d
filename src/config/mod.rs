//! Configuration management
//!
//! Layered configuration loaded from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file (`config/memebox.toml`, override via
//!    `MEMEBOX_CONFIG`)
//! 3. Environment variables (`MEMEBOX__<section>__<key>`, plus the
//!    coordinator deployment variables `API_KEY` and `URL`)
//!
//! Examples:
//! - `MEMEBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `MEMEBOX__COLLECTOR__CYCLE_INTERVAL_SECS=300`
//! - `API_KEY=shared-secret URL=https://coordinator.example`

mod models;
mod sources;
mod validation;

pub use models::{CollectorConfig, Config, RemoteConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[remote]
base_url = "http://coordinator:4000"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.remote.base_url, "http://coordinator:4000");
        assert_eq!(config.collector.cycle_interval_secs, 180);
    }

    #[test]
    fn test_validation_catches_bad_budget() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[collector]
cycle_interval_secs = 30
download_reserve_secs = 45
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::ReserveExceedsInterval { .. })
        ));
    }
}

//! Application settings for shareup
//!
//! Settings are layered:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use shareup::config::Settings;
//!
//! let settings = Settings::load().expect("Failed to load settings");
//! println!("Targets catalog: {}", settings.targets.path.display());
//! ```
//!
//! # Environment Variables
//!
//! Settings can be overridden with `SHAREUP__<section>__<key>`:
//! - `SHAREUP__TARGETS__PATH=/etc/shareup/targets.json`
//! - `SHAREUP__CLIPBOARD__ENABLED=false`
//! - `SHAREUP__NOTIFICATIONS__COMMAND=dunstify`
//!
//! # Configuration File
//!
//! By default settings are read from `config/shareup.toml`.
//! This can be overridden using the `SHAREUP_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{ClipboardConfig, LoggingConfig, NotificationConfig, Settings, TargetsConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Settings {
    /// Load settings from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = sources::load()?;
        validation::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let settings = sources::load_from_sources(path)?;
        validation::validate(&settings)?;
        Ok(settings)
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
        let config_path = temp_dir.path().join("shareup.toml");

        fs::write(&config_path, "[targets]\npath = \"targets.json\"\n").unwrap();

        let settings = Settings::load_from_path(config_path).unwrap();
        assert_eq!(settings.targets.path.to_str(), Some("targets.json"));
    }

    #[test]
    fn test_validation_catches_empty_clipboard_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shareup.toml");

        fs::write(&config_path, "[clipboard]\ncommand = [\"\"]\n").unwrap();

        let result = Settings::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::EmptyClipboardCommand)
        ));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shareup.toml");

        fs::write(&config_path, "[clipboard\nenabled = ").unwrap();

        assert!(matches!(
            Settings::load_from_path(config_path),
            Err(ConfigError::LoadError(_))
        ));
    }
}

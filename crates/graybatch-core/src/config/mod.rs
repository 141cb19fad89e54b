//! Configuration management for graybatch.
//!
//! Configuration is optional: without a config file the converter reads
//! `./input/` and writes `./output/`. A TOML file at the platform config
//! location (or passed explicitly) overrides any of the defaults.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for graybatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output directories
    pub paths: PathsConfig,

    /// Concurrency and failure handling
    pub processing: ProcessingConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.graybatch.graybatch/config.toml
    /// - Linux: ~/.config/graybatch/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\graybatch\config\config.toml
    ///
    /// Falls back to ~/.graybatch/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "graybatch", "graybatch")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".graybatch").join("config.toml")
            })
    }

    /// Resolved input directory (with ~ expansion).
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.paths.input_dir)
    }

    /// Resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.paths.output_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.input_dir, PathBuf::from("./input/"));
        assert_eq!(config.paths.output_dir, PathBuf::from("./output/"));
        assert_eq!(config.processing.failure_policy, FailurePolicy::Abort);
        assert!(config.processing.parallel_workers.is_none());
        assert!(config.processing.workers() >= 1);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("failure_policy = \"abort\""));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [processing]
            parallel_workers = 3
            failure_policy = "isolate"
            "#,
        )
        .unwrap();
        assert_eq!(config.processing.workers(), 3);
        assert_eq!(config.processing.failure_policy, FailurePolicy::Isolate);
        assert_eq!(config.paths.output_dir, PathBuf::from("./output/"));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = Config::from_toml("[processing]\nfailure_policy = \"retry\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[paths]\ninput_dir = \"in\"\noutput_dir = \"out\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.input_dir(), PathBuf::from("in"));
        assert_eq!(config.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = Config::default();
        config.paths.input_dir = PathBuf::from("~/pictures");
        assert!(!config.input_dir().to_string_lossy().starts_with('~'));
    }
}

//! Configuration validation with range checks.

use std::path::{Component, Path};

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == Some(0) {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.paths.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "paths.input_dir must not be empty".into(),
            ));
        }
        if self.paths.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "paths.output_dir must not be empty".into(),
            ));
        }
        if same_dir(&self.input_dir(), &self.output_dir()) {
            return Err(ConfigError::ValidationError(
                "paths.input_dir and paths.output_dir must differ".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if self.logging.format != "pretty" && self.logging.format != "json" {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

/// Compare directories ignoring `./` prefixes and trailing separators.
fn same_dir(a: &Path, b: &Path) -> bool {
    fn significant(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
    significant(a) == significant(b)
}

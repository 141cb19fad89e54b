//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input and output directory locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for `*.png` files
    pub input_dir: PathBuf,

    /// Directory receiving the grayscale copies
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input/"),
            output_dir: PathBuf::from("./output/"),
        }
    }
}

/// What a batch does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The first failure ends the whole batch
    #[default]
    Abort,

    /// Failures are recorded and the remaining files still convert
    Isolate,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Isolate => f.write_str("isolate"),
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files converted at once. Unset means one per available core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_workers: Option<usize>,

    /// Behavior on a per-file failure
    pub failure_policy: FailurePolicy,
}

impl ProcessingConfig {
    /// Resolved worker count, never zero.
    pub fn workers(&self) -> usize {
        self.parallel_workers
            .filter(|&n| n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

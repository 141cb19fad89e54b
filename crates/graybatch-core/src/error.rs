//! Error types for the graybatch conversion pipeline.
//!
//! Errors are organized by stage so a failure message always names the file
//! and the step that broke (open, decode, create, encode, ...).

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input or output directory could not be created
    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input directory could not be listed
    #[error("Cannot list directory {path}: {message}")]
    List { path: PathBuf, message: String },

    /// Input file could not be opened
    #[error("File could not be opened: {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding failed
    #[error("Image could not be decoded: {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Content is not a PNG image
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Output file could not be created
    #[error("Cannot create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding or the final write failed
    #[error("Cannot encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// A conversion task panicked or was cancelled
    #[error("Conversion task failed for {path}: {message}")]
    Join { path: PathBuf, message: String },
}

impl PipelineError {
    /// The file or directory this error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CreateDir { path, .. }
            | Self::List { path, .. }
            | Self::Open { path, .. }
            | Self::Decode { path, .. }
            | Self::UnsupportedFormat { path, .. }
            | Self::Create { path, .. }
            | Self::Encode { path, .. }
            | Self::Join { path, .. } => path,
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

//! graybatch core - batch PNG to grayscale conversion.
//!
//! Every `*.png` directly inside the input directory is decoded, averaged
//! to gray and written under the same name into the output directory:
//!
//! ```text
//! input/*.png → Decode → Grayscale → Encode → output/*.png
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use graybatch_core::{BatchRunner, Config, RunOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     match BatchRunner::new(&config).run().await? {
//!         RunOutcome::InputDirCreated(dir) => println!("Created {:?}", dir),
//!         RunOutcome::Completed(summary) => println!("{} converted", summary.succeeded),
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, FailurePolicy};
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use pipeline::{BatchOptions, BatchRunner, DiscoveredFile, ImageConverter, RunOutcome};
pub use types::{BatchSummary, ConvertedImage, FileFailure, ImageSize, Pixel, PixelGrid};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

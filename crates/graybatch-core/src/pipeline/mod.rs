//! Image conversion pipeline components.
//!
//! - **discovery**: List the PNG files in the input directory
//! - **decode**: Open and decode PNG content into a pixel grid
//! - **grayscale**: The per-pixel luminance-average transform
//! - **encode**: Write a pixel grid back out as PNG
//! - **processor**: Converts one file end to end
//! - **batch**: Directory setup and bounded concurrent fan-out

pub mod batch;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod grayscale;
pub mod processor;

// Re-exports for convenient access
pub use batch::{BatchOptions, BatchRunner, RunOutcome};
pub use decode::ImageDecoder;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::PngWriter;
pub use grayscale::{grayscale, to_gray};
pub use processor::ImageConverter;

//! Single-file conversion - wires decode, grayscale and encode together.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{PipelineError, PipelineResult};
use crate::types::ConvertedImage;

use super::decode::ImageDecoder;
use super::encode::PngWriter;
use super::grayscale::grayscale;

/// Converts one PNG into a grayscale PNG with the same name in `output_dir`.
///
/// Blocking: the batch runner calls it from `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct ImageConverter {
    decoder: ImageDecoder,
    writer: PngWriter,
    output_dir: PathBuf,
}

impl ImageConverter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            decoder: ImageDecoder::new(),
            writer: PngWriter::new(),
            output_dir: output_dir.into(),
        }
    }

    /// Where the grayscale copy of `input` is written.
    pub fn output_path_for(&self, input: &Path) -> PipelineResult<PathBuf> {
        let name = input.file_name().ok_or_else(|| PipelineError::Open {
            path: input.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
        Ok(self.output_dir.join(name))
    }

    /// Convert one file end to end.
    pub fn convert(&self, input: &Path) -> PipelineResult<ConvertedImage> {
        let start = Instant::now();
        tracing::debug!("Converting: {:?}", input);

        let output_path = self.output_path_for(input)?;

        // Open
        let file = File::open(input).map_err(|e| PipelineError::Open {
            path: input.to_path_buf(),
            source: e,
        })?;

        // Decode
        let decode_start = Instant::now();
        let grid = self.decoder.decode(BufReader::new(file), input)?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        // Transform
        let gray_start = Instant::now();
        let gray = grayscale(&grid);
        drop(grid);
        tracing::trace!("  Grayscale: {:?}", gray_start.elapsed());

        // Create + encode
        let encode_start = Instant::now();
        self.writer.write_file(&gray, &output_path)?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        let elapsed = start.elapsed();
        tracing::debug!(
            "Converted {:?} in {:?} ({})",
            input.file_name().unwrap_or_default(),
            elapsed,
            gray.size()
        );

        Ok(ConvertedImage {
            input_path: input.to_path_buf(),
            output_path,
            size: gray.size(),
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }
}

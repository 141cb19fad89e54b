//! PNG decoding into a `PixelGrid`, with content sniffing.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use crate::error::PipelineError;
use crate::types::{ImageSize, Pixel, PixelGrid};

/// Decodes PNG streams into pixel grids.
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode an already-opened stream.
    ///
    /// The format is detected from the content, not the file name; anything
    /// other than PNG is rejected. `path` is only used for error messages.
    pub fn decode<R: BufRead + Seek>(
        &self,
        reader: R,
        path: &Path,
    ) -> Result<PixelGrid, PipelineError> {
        let reader = ImageReader::new(reader)
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        match reader.format() {
            Some(ImageFormat::Png) => {}
            Some(other) => {
                return Err(PipelineError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: format!("{:?}", other).to_lowercase(),
                })
            }
            None => {
                return Err(PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: "unknown format".to_string(),
                })
            }
        }

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self::to_grid(&image))
    }

    /// Decode from an in-memory buffer.
    pub fn decode_bytes(&self, bytes: &[u8], path: &Path) -> Result<PixelGrid, PipelineError> {
        self.decode(Cursor::new(bytes), path)
    }

    /// Expand to 16-bit RGBA, premultiply by alpha, then scale down by 257.
    ///
    /// Opaque 8-bit sources come back with their stored bytes unchanged.
    pub fn to_grid(image: &DynamicImage) -> PixelGrid {
        let (width, height) = image.dimensions();
        let rgba = image.to_rgba16();
        PixelGrid::from_fn(ImageSize::new(width, height), |x, y| {
            Pixel::from_straight16(rgba.get_pixel(x, y).0)
        })
    }
}

//! PNG encoding of a `PixelGrid`.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PipelineError;
use crate::types::PixelGrid;

/// Writes pixel grids out as RGBA8 PNG files.
#[derive(Debug, Clone, Default)]
pub struct PngWriter;

impl PngWriter {
    pub fn new() -> Self {
        Self
    }

    /// Copy a grid into a straight-alpha `RgbaImage` of the same dimensions.
    pub fn to_image(grid: &PixelGrid) -> RgbaImage {
        let mut img = RgbaImage::new(grid.width(), grid.height());
        for (x, y, out) in img.enumerate_pixels_mut() {
            if let Some(px) = grid.get(x, y) {
                *out = Rgba(px.to_straight());
            }
        }
        img
    }

    /// Encode a grid as PNG into any writer.
    pub fn encode<W: Write>(
        &self,
        grid: &PixelGrid,
        writer: W,
        path: &Path,
    ) -> Result<(), PipelineError> {
        let img = Self::to_image(grid);
        PngEncoder::new(writer)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| PipelineError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Create `path` (truncating an existing file) and encode the grid into it.
    pub fn write_file(&self, grid: &PixelGrid, path: &Path) -> Result<(), PipelineError> {
        let file = File::create(path).map_err(|e| PipelineError::Create {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        self.encode(grid, &mut writer, path)?;
        writer.flush().map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: format!("Flush failed: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageSize, Pixel};

    #[test]
    fn test_to_image_copies_every_pixel() {
        let grid = PixelGrid::from_fn(ImageSize::new(5, 3), |x, y| {
            Pixel::new(x as u8, y as u8, (x + y) as u8, 255)
        });
        let img = PngWriter::to_image(&grid);

        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(4, 2), &Rgba([4, 2, 6, 255]));
        assert_eq!(img.get_pixel(0, 1), &Rgba([0, 1, 1, 255]));
    }

    #[test]
    fn test_to_image_unpremultiplies() {
        let grid = PixelGrid::from_fn(ImageSize::new(2, 1), |x, _| {
            if x == 0 {
                Pixel::new(33, 33, 33, 100)
            } else {
                Pixel::new(9, 9, 9, 0)
            }
        });
        let img = PngWriter::to_image(&grid);

        assert_eq!(img.get_pixel(0, 0), &Rgba([84, 84, 84, 100]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_encode_into_failing_writer_is_encode_error() {
        let grid = PixelGrid::filled(ImageSize::new(4, 4), Pixel::new(10, 10, 10, 255));

        let err = PngWriter::new()
            .encode(&grid, BrokenPipe, Path::new("out/x.png"))
            .unwrap_err();

        assert!(matches!(err, PipelineError::Encode { .. }));
        assert_eq!(err.path(), Path::new("out/x.png"));
        assert!(err.to_string().contains("Cannot encode"));
    }

    #[test]
    fn test_encode_produces_png_signature() {
        let grid = PixelGrid::filled(ImageSize::new(8, 8), Pixel::new(50, 50, 50, 255));
        let mut bytes = Vec::new();
        PngWriter::new()
            .encode(&grid, &mut bytes, Path::new("mem.png"))
            .unwrap();

        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_write_file_into_missing_dir_fails_on_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("x.png");
        let grid = PixelGrid::filled(ImageSize::new(1, 1), Pixel::default());

        let err = PngWriter::new().write_file(&grid, &path).unwrap_err();
        assert!(matches!(err, PipelineError::Create { .. }));
    }

    #[test]
    fn test_write_file_roundtrips_through_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        // Opaque: translucent values are not exact through a straight-alpha file
        let grid = PixelGrid::from_fn(ImageSize::new(3, 4), |x, y| {
            let v = (x * 40 + y * 10) as u8;
            Pixel::new(v, v, v, 255)
        });

        PngWriter::new().write_file(&grid, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let decoded = crate::pipeline::ImageDecoder::new()
            .decode_bytes(&bytes, &path)
            .unwrap();
        assert_eq!(decoded, grid);
    }
}

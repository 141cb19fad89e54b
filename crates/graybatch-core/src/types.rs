//! Core data types for the graybatch pipeline.
//!
//! `Pixel`, `ImageSize` and `PixelGrid` live only inside one conversion;
//! `ConvertedImage` and `BatchSummary` are what a run reports back.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One RGBA pixel with 8-bit channels.
///
/// Color channels are alpha-premultiplied, so `r`, `g` and `b` never exceed
/// `a`. PNG stores straight alpha; see [`Pixel::from_straight16`] and
/// [`Pixel::to_straight`] for the conversions at the file boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a pixel from straight-alpha 16-bit channels (0..=65535).
    ///
    /// Color is premultiplied at 16 bits, then every channel is scaled down
    /// by 257 with truncation.
    pub fn from_straight16(channels: [u16; 4]) -> Self {
        let [r, g, b, a] = channels.map(u32::from);
        let premul = |c: u32| (c * a / 0xffff / 257) as u8;
        Self {
            r: premul(r),
            g: premul(g),
            b: premul(b),
            a: (a / 257) as u8,
        }
    }

    /// Straight-alpha RGBA8 channels for writing to PNG.
    ///
    /// Fully transparent pixels become `[0, 0, 0, 0]` and opaque ones are
    /// copied as is.
    pub fn to_straight(self) -> [u8; 4] {
        match self.a {
            0 => [0; 4],
            255 => [self.r, self.g, self.b, 255],
            a => {
                let a16 = u32::from(a) * 0x101;
                let unpremul =
                    |c: u8| ((u32::from(c) * 0x101 * 0xffff / a16) >> 8).min(255) as u8;
                [unpremul(self.r), unpremul(self.g), unpremul(self.b), a]
            }
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decoded image as a row-major grid of pixels.
///
/// The buffer is always `size.width * size.height` long; every constructor
/// derives it from the size, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    size: ImageSize,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Build a grid by evaluating `f(x, y)` for every coordinate, row by row.
    pub fn from_fn(size: ImageSize, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut pixels = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.push(f(x, y));
            }
        }
        Self { size, pixels }
    }

    /// A grid filled with one pixel value.
    pub fn filled(size: ImageSize, pixel: Pixel) -> Self {
        Self {
            size,
            pixels: vec![pixel; size.area()],
        }
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Apply `f` to every pixel, producing a grid of the same size.
    pub fn map(&self, f: impl Fn(Pixel) -> Pixel) -> Self {
        Self {
            size: self.size,
            pixels: self.pixels.iter().map(|&p| f(p)).collect(),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }
}

/// Report for one successfully converted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedImage {
    /// Source PNG
    pub input_path: PathBuf,

    /// Written grayscale PNG
    pub output_path: PathBuf,

    /// Dimensions shared by input and output
    pub size: ImageSize,

    /// Wall time spent on this file in milliseconds
    pub elapsed_ms: u64,
}

/// A file that failed under the isolate policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    /// Files returned by the lister
    pub discovered: usize,

    /// Files converted successfully
    pub succeeded: usize,

    /// Files that failed (only non-zero under the isolate policy)
    pub failed: usize,

    /// Per-file failure details
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileFailure>,

    /// Output files written, sorted by path
    pub outputs: Vec<PathBuf>,

    /// Processing rate in images per second
    pub images_per_second: f64,

    /// Total processing time in seconds
    pub total_seconds: f64,
}

impl BatchSummary {
    /// Whether every discovered file was converted.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

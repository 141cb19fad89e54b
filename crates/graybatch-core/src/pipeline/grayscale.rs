//! The luminance-average grayscale transform.

use crate::types::{Pixel, PixelGrid};

/// Average the color channels into one gray level, keeping alpha.
///
/// `v = (r + g + b) / 3` with integer division; the sum of three `u8`s can
/// never average above 255 but the clamp keeps the cast honest.
pub fn to_gray(px: Pixel) -> Pixel {
    let sum = u16::from(px.r) + u16::from(px.g) + u16::from(px.b);
    let v = (sum / 3).min(255) as u8;
    Pixel::new(v, v, v, px.a)
}

/// Grayscale every pixel of a grid.
pub fn grayscale(grid: &PixelGrid) -> PixelGrid {
    grid.map(to_gray)
}

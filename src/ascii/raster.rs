//! Raster image to filled/empty grid conversion.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::grid::CharacterGrid;
use crate::error::NoiseError;

/// A cell is dark when its red channel is below this value (0-255).
pub const DARKNESS_THRESHOLD: u8 = 120;

/// A cell is opaque when its alpha channel is at least this value (0-255).
pub const OPACITY_THRESHOLD: u8 = 50;

/// A decoded RGBA image handed over by an image source.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Build an image from raw RGBA bytes. Returns `None` when the buffer
    /// length doesn't match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Height / width of the image, or `None` for an image without pixels.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width() == 0 || self.height() == 0 {
            None
        } else {
            Some(self.height() as f64 / self.width() as f64)
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Classify one RGBA sample: dark enough and opaque enough.
pub fn is_filled(pixel: Rgba<u8>) -> bool {
    let [r, _, _, a] = pixel.0;
    r < DARKNESS_THRESHOLD && a >= OPACITY_THRESHOLD
}

/// Resample `image` to `cols x rows` and classify every cell.
///
/// A zero-sized target yields an empty grid.
pub fn rasterize(image: &RasterImage, cols: u32, rows: u32) -> Result<CharacterGrid, NoiseError> {
    if cols == 0 || rows == 0 || image.width() == 0 || image.height() == 0 {
        return Ok(CharacterGrid::new(cols, rows));
    }

    let sampled = imageops::resize(image.pixels(), cols, rows, FilterType::Nearest);
    let mut grid = CharacterGrid::new(cols, rows);

    for y in 0..rows {
        for x in 0..cols {
            let pixel = sampled
                .get_pixel_checked(x, y)
                .ok_or(NoiseError::Bounds {
                    x,
                    y,
                    width: sampled.width(),
                    height: sampled.height(),
                })?;
            grid.set(x, y, is_filled(*pixel));
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> RasterImage {
        RasterImage::new(RgbaImage::from_pixel(width, height, Rgba(pixel)))
    }

    #[test]
    fn test_is_filled_thresholds() {
        assert!(is_filled(Rgba([0, 0, 0, 255])));
        assert!(is_filled(Rgba([119, 255, 255, 50])));
        assert!(!is_filled(Rgba([120, 0, 0, 255])));
        assert!(!is_filled(Rgba([0, 0, 0, 49])));
        assert!(!is_filled(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_rasterize_solid_black() {
        let grid = rasterize(&solid(60, 30, [0, 0, 0, 255]), 6, 3).unwrap();
        assert_eq!(grid.cols(), 6);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.filled_count(), 18);
    }

    #[test]
    fn test_rasterize_transparent_is_empty() {
        let grid = rasterize(&solid(60, 30, [0, 0, 0, 0]), 6, 3).unwrap();
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_rasterize_left_half_dark() {
        let mut pixels = RgbaImage::from_pixel(8, 2, Rgba([255, 255, 255, 255]));
        for y in 0..2 {
            for x in 0..4 {
                pixels.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let grid = rasterize(&RasterImage::new(pixels), 4, 1).unwrap();
        assert!(grid.is_filled(0, 0));
        assert!(grid.is_filled(1, 0));
        assert!(!grid.is_filled(2, 0));
        assert!(!grid.is_filled(3, 0));
    }

    #[test]
    fn test_rasterize_zero_target() {
        let grid = rasterize(&solid(10, 10, [0, 0, 0, 255]), 0, 5).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(solid(200, 100, [0; 4]).aspect_ratio(), Some(0.5));
        assert_eq!(RasterImage::new(RgbaImage::new(0, 0)).aspect_ratio(), None);
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(RasterImage::from_rgba(1, 1, vec![0, 0, 0, 255]).is_some());
        assert!(RasterImage::from_rgba(2, 1, vec![0, 0, 0, 255]).is_none());
    }
}

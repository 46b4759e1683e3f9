//! Grayscale raster rendering.
//!
//! The service returns one intensity byte per pixel; display-side we expand
//! that to RGBA by pure replication, no gamma correction, alpha opaque.

use crate::core::types::ImageResult;
use image::{Rgba, RgbaImage};

/// Longest edge of the on-screen display box, in pixels.
pub const DISPLAY_MAX_EDGE: u32 = 200;

/// Expand a grayscale buffer to an RGBA raster, `v -> (v, v, v, 255)`.
///
/// The buffer must be consistent (`width * height == data.len()`); extra or
/// missing samples would misalign every following row.
pub fn to_rgba(image: &ImageResult) -> Option<RgbaImage> {
    if !image.is_consistent() {
        return None;
    }
    let mut raster = RgbaImage::new(image.width, image.height);
    for (pixel, &v) in raster.pixels_mut().zip(image.data.iter()) {
        *pixel = Rgba([v, v, v, 255]);
    }
    Some(raster)
}

/// Scale dimensions to fit inside a square box of edge `max_edge`,
/// preserving aspect ratio. The longer edge maps to `max_edge` exactly.
///
/// This is a presentation transform only; the underlying buffer is never
/// resampled here.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width >= height {
        let scaled = (u64::from(height) * u64::from(max_edge) / u64::from(width)) as u32;
        (max_edge, scaled.max(1))
    } else {
        let scaled = (u64::from(width) * u64::from(max_edge) / u64::from(height)) as u32;
        (scaled.max(1), max_edge)
    }
}

/// Display-box dimensions for an image, using [`DISPLAY_MAX_EDGE`].
pub fn display_size(image: &ImageResult) -> (u32, u32) {
    fit_within(image.width, image.height, DISPLAY_MAX_EDGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_replicates_intensity() {
        let image = ImageResult::new(2, 1, vec![0, 200]);
        let raster = to_rgba(&image).unwrap();
        assert_eq!(raster.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(raster.get_pixel(1, 0), &Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn test_inconsistent_buffer_refused() {
        let image = ImageResult::new(2, 2, vec![1, 2, 3]);
        assert!(to_rgba(&image).is_none());
    }

    #[test]
    fn test_fit_wide_image() {
        assert_eq!(fit_within(400, 100, DISPLAY_MAX_EDGE), (200, 50));
    }

    #[test]
    fn test_fit_tall_image() {
        assert_eq!(fit_within(100, 400, DISPLAY_MAX_EDGE), (50, 200));
    }

    #[test]
    fn test_fit_square_image() {
        assert_eq!(fit_within(512, 512, DISPLAY_MAX_EDGE), (200, 200));
    }

    #[test]
    fn test_fit_never_collapses_to_zero() {
        assert_eq!(fit_within(10_000, 1, DISPLAY_MAX_EDGE), (200, 1));
        assert_eq!(fit_within(0, 10, DISPLAY_MAX_EDGE), (0, 0));
    }
}

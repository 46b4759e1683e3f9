//! Histogram rendering.
//!
//! Bins are computed remotely; this module only draws a precomputed 256-bin
//! count array onto a fixed-height canvas. Normalization divides by the
//! maximum count with the denominator clamped to 1, so an all-zero
//! histogram draws an empty canvas instead of dividing by zero.

use crate::core::types::{HistogramData, HISTOGRAM_BINS};
use image::{Rgba, RgbaImage};

/// Canvas width, one horizontal unit per bin.
pub const CANVAS_WIDTH: u32 = 256;
/// Canvas height including the top margin.
pub const CANVAS_HEIGHT: u32 = 120;
/// Drawable bar area; bars never reach into the top margin.
pub const BAR_AREA_HEIGHT: u32 = 110;
/// Vertical distance between horizontal gridlines.
pub const GRIDLINE_STRIDE: u32 = 30;
/// Bar width used in sparse mode.
pub const SPARSE_BAR_WIDTH: u32 = 3;
/// Sparse mode kicks in at this many distinct non-zero bins or fewer.
pub const SPARSE_THRESHOLD: usize = 20;

const BACKGROUND: Rgba<u8> = Rgba([24, 24, 24, 255]);
const GRIDLINE: Rgba<u8> = Rgba([60, 60, 60, 255]);
const BAR: Rgba<u8> = Rgba([180, 180, 180, 255]);

/// Drawing view over a histogram.
///
/// Holds a borrowed histogram plus the derived normalization maximum, so
/// repeated bar-height queries during a redraw do not rescan the bins.
pub struct HistogramView<'a> {
    histogram: &'a HistogramData,
    max_count: u64,
}

impl<'a> HistogramView<'a> {
    pub fn new(histogram: &'a HistogramData) -> Self {
        Self {
            histogram,
            // denominator clamps to 1 for all-zero histograms
            max_count: histogram.max_count().max(1),
        }
    }

    /// Bar height in canvas pixels for one bin, 0..=[`BAR_AREA_HEIGHT`].
    /// The peak bin always reaches the full bar area.
    pub fn bar_height(&self, bin: usize) -> u32 {
        let count = self.histogram.count(bin);
        ((count as f64 / self.max_count as f64) * f64::from(BAR_AREA_HEIGHT)).round() as u32
    }

    /// Whether sparse rendering applies: at most [`SPARSE_THRESHOLD`]
    /// distinct non-zero bins. Wide bars keep a near-empty histogram from
    /// degenerating into a few invisible 1-unit lines.
    pub fn is_sparse(&self) -> bool {
        self.histogram.distinct_levels() <= SPARSE_THRESHOLD
    }

    /// Bin index and count under a horizontal cursor position. The index is
    /// the pixel position clamped to `[0, 255]`.
    pub fn bin_at(&self, x: i64) -> (usize, u64) {
        let bin = x.clamp(0, HISTOGRAM_BINS as i64 - 1) as usize;
        (bin, self.histogram.count(bin))
    }

    /// Draw the full canvas: background, gridlines, then bars.
    pub fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

        // gridlines at every stride multiple measured from the top
        let mut y = CANVAS_HEIGHT;
        while y > GRIDLINE_STRIDE {
            y -= GRIDLINE_STRIDE;
            for x in 0..CANVAS_WIDTH {
                canvas.put_pixel(x, y, GRIDLINE);
            }
        }

        let bar_width = if self.is_sparse() { SPARSE_BAR_WIDTH } else { 1 };
        for bin in 0..HISTOGRAM_BINS {
            let height = self.bar_height(bin);
            if height == 0 {
                continue;
            }
            let x0 = bin as u32;
            for dx in 0..bar_width {
                let x = x0.saturating_add(dx).min(CANVAS_WIDTH - 1);
                for dy in 0..height {
                    canvas.put_pixel(x, CANVAS_HEIGHT - 1 - dy, BAR);
                }
            }
        }
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram_with(bins: &[(usize, u64)]) -> HistogramData {
        let mut counts = vec![0u64; HISTOGRAM_BINS];
        for &(bin, count) in bins {
            counts[bin] = count;
        }
        HistogramData::new(counts).unwrap()
    }

    #[test]
    fn test_peak_reaches_full_bar_area() {
        let histogram = histogram_with(&[(42, 100)]);
        let view = HistogramView::new(&histogram);
        assert_eq!(view.bar_height(42), BAR_AREA_HEIGHT);
        assert_eq!(view.bar_height(41), 0);
    }

    #[test]
    fn test_all_zero_histogram_renders() {
        let histogram = HistogramData::empty();
        let view = HistogramView::new(&histogram);
        assert_eq!(view.bar_height(0), 0);

        let canvas = view.render();
        assert_eq!(canvas.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(canvas.get_pixel(0, CANVAS_HEIGHT - 1), &BACKGROUND);
    }

    #[test]
    fn test_heights_scale_against_peak() {
        let histogram = histogram_with(&[(10, 50), (20, 100)]);
        let view = HistogramView::new(&histogram);
        assert_eq!(view.bar_height(20), BAR_AREA_HEIGHT);
        assert_eq!(view.bar_height(10), BAR_AREA_HEIGHT / 2);
    }

    #[test]
    fn test_sparse_mode_threshold() {
        let few: Vec<(usize, u64)> = (0..20).map(|i| (i * 12, 5)).collect();
        let histogram = histogram_with(&few);
        assert!(HistogramView::new(&histogram).is_sparse());

        let many: Vec<(usize, u64)> = (0..21).map(|i| (i * 12, 5)).collect();
        let histogram = histogram_with(&many);
        assert!(!HistogramView::new(&histogram).is_sparse());
    }

    #[test]
    fn test_gridlines_on_stride_multiples() {
        let histogram = HistogramData::empty();
        let canvas = HistogramView::new(&histogram).render();

        for y in [30, 60, 90] {
            assert_eq!(canvas.get_pixel(0, y), &GRIDLINE, "row {y}");
        }
        for y in [29, 31, 119] {
            assert_eq!(canvas.get_pixel(0, y), &BACKGROUND, "row {y}");
        }
    }

    #[test]
    fn test_sparse_bars_are_wide() {
        let histogram = histogram_with(&[(100, 9)]);
        let view = HistogramView::new(&histogram);
        let canvas = view.render();
        for x in 100..103 {
            assert_eq!(canvas.get_pixel(x, CANVAS_HEIGHT - 1), &BAR);
        }
    }

    #[test]
    fn test_hover_clamps_to_bin_range() {
        let histogram = histogram_with(&[(0, 3), (255, 7)]);
        let view = HistogramView::new(&histogram);
        assert_eq!(view.bin_at(-10), (0, 3));
        assert_eq!(view.bin_at(128), (128, 0));
        assert_eq!(view.bin_at(9_999), (255, 7));
    }
}

//! Core value types shared across the editor core.
//!
//! The type system uses an enum-based approach for the same reasons the
//! payload model does:
//! - Closed set of types: the processing service speaks a finite vocabulary
//! - Zero-cost pattern matching: exhaustive matches catch missing cases
//! - Serialization: serde handles the wire names natively

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of intensity bins in a histogram (one per 8-bit level).
pub const HISTOGRAM_BINS: usize = 256;

/// A resolved grayscale image produced by the processing service.
///
/// `data` holds one intensity sample per pixel in row-major order;
/// the invariant `data.len() == width * height` is established by the
/// validator on the way in and by the reconciler on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major intensity samples, 0-255.
    pub data: Vec<u8>,
}

impl ImageResult {
    /// Create a new image result.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// Number of pixels the dimensions declare.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the buffer length matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.pixel_count()
    }

    /// Dump the pixel buffer byte-for-byte, no header.
    ///
    /// This is the downloadable artifact for SAVE nodes: a raw intensity
    /// stream that round-trips through the service's `/upload-raw` endpoint.
    pub fn write_raw(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(&self.data)
    }
}

impl fmt::Display for ImageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{})", self.width, self.height)
    }
}

/// Intensity histogram: 256 bin counts for levels 0-255.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistogramData {
    counts: Vec<u64>,
}

impl HistogramData {
    /// Wrap a 256-entry count array.
    ///
    /// Returns `None` when the bin count is wrong; the reconciler uses this
    /// to reject malformed service responses without panicking.
    pub fn new(counts: Vec<u64>) -> Option<Self> {
        if counts.len() == HISTOGRAM_BINS {
            Some(Self { counts })
        } else {
            None
        }
    }

    /// An all-zero histogram.
    pub fn empty() -> Self {
        Self {
            counts: vec![0; HISTOGRAM_BINS],
        }
    }

    /// Count for a single bin.
    pub fn count(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// All bin counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Largest bin count.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Number of bins with a non-zero count.
    pub fn distinct_levels(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of samples across all bins.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Point operations the processing service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointOperation {
    /// Add a constant to every pixel, clamped to [0, 255].
    Brightness,
    /// Binarize: pixels >= value become 255, the rest 0.
    Threshold,
}

impl PointOperation {
    /// Default parameter value for this operation.
    pub fn default_value(self) -> f64 {
        match self {
            PointOperation::Brightness => 0.0,
            PointOperation::Threshold => 128.0,
        }
    }

    /// Valid parameter range for this operation.
    pub fn value_range(self) -> (f64, f64) {
        match self {
            PointOperation::Brightness => (-255.0, 255.0),
            PointOperation::Threshold => (0.0, 255.0),
        }
    }
}

impl fmt::Display for PointOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointOperation::Brightness => write!(f, "brightness"),
            PointOperation::Threshold => write!(f, "threshold"),
        }
    }
}

/// How a convolution node's window is interpreted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Weighted sum of the window divided by the divisor.
    Convolution,
    /// Median of the window; the kernel is a display-only marker.
    Median,
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterType::Convolution => write!(f, "convolution"),
            FilterType::Median => write!(f, "median"),
        }
    }
}

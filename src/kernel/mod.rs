//! Convolution kernel synthesis.
//!
//! Pure, stateless generators for the kernels a convolution node can carry.
//! Sizes are constrained by the caller (the editing surface offers 3, 5, 7
//! and 9); the synthesizer itself assumes an odd size >= 3 and does not
//! validate it.

use crate::core::types::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A square convolution kernel with its normalization divisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    /// Edge length of the square matrix.
    pub size: usize,
    /// Row-major weight matrix, `size` x `size`.
    pub matrix: Vec<Vec<f64>>,
    /// Normalization factor applied by the service after weighting.
    pub divisor: f64,
}

impl Kernel {
    /// Weight at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[row][col]
    }

    /// Sum of all weights, useful for sanity checks.
    pub fn weight_sum(&self) -> f64 {
        self.matrix.iter().flatten().sum()
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} kernel (divisor {})", self.size, self.size, self.divisor)
    }
}

/// Averaging kernel: all ones, divisor `size * size`.
pub fn average(size: usize) -> Kernel {
    Kernel {
        size,
        matrix: vec![vec![1.0; size]; size],
        divisor: (size * size) as f64,
    }
}

/// Laplacian edge-detection kernel in a cross pattern.
///
/// Cells sharing the center row or column (excluding the center itself)
/// weigh -1, the center weighs `2 * (size - 1)`, everything else is 0.
/// Size 3 uses the classic 4-neighbor kernel verbatim; the generic formula
/// produces the same center weight but the special case preserves the exact
/// matrix historically used.
pub fn laplacian(size: usize) -> Kernel {
    let center = size / 2;

    let matrix = if size == 3 {
        vec![
            vec![0.0, -1.0, 0.0],
            vec![-1.0, 4.0, -1.0],
            vec![0.0, -1.0, 0.0],
        ]
    } else {
        (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| {
                        if i == center && j == center {
                            2.0 * (size as f64 - 1.0)
                        } else if i == center || j == center {
                            -1.0
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect()
    };

    Kernel {
        size,
        matrix,
        divisor: 1.0,
    }
}

/// Window marker for the median filter: all ones, divisor 1.
///
/// The matrix carries no numeric meaning; the service selects the median of
/// the window itself. The marker only exists so the editing surface has a
/// grid to display.
pub fn median_window(size: usize) -> Kernel {
    Kernel {
        size,
        matrix: vec![vec![1.0; size]; size],
        divisor: 1.0,
    }
}

/// Preset kernel families the convolution node offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Average,
    Median,
    Laplacian,
}

impl Preset {
    /// All presets in menu order.
    pub const ALL: [Preset; 3] = [Preset::Average, Preset::Median, Preset::Laplacian];

    /// The wire tag stored in a convolution payload.
    pub fn tag(self) -> &'static str {
        match self {
            Preset::Average => "average",
            Preset::Median => "median",
            Preset::Laplacian => "laplacian",
        }
    }

    /// Look a preset up by its wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "average" => Some(Preset::Average),
            "median" => Some(Preset::Median),
            "laplacian" => Some(Preset::Laplacian),
            _ => None,
        }
    }

    /// Synthesize this preset's kernel for the given window size.
    pub fn kernel(self, size: usize) -> Kernel {
        match self {
            Preset::Average => average(size),
            Preset::Median => median_window(size),
            Preset::Laplacian => laplacian(size),
        }
    }

    /// How the service interprets the node's window under this preset.
    pub fn filter_type(self) -> FilterType {
        match self {
            Preset::Median => FilterType::Median,
            _ => FilterType::Convolution,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_average_kernel() {
        for size in [3, 5, 7, 9] {
            let k = average(size);
            assert_eq!(k.size, size);
            assert_eq!(k.divisor, (size * size) as f64);
            assert!(k.matrix.iter().flatten().all(|&w| w == 1.0));
            assert_eq!(k.matrix.len(), size);
            assert!(k.matrix.iter().all(|row| row.len() == size));
        }
    }

    #[test]
    fn test_laplacian_3_is_classical() {
        let k = laplacian(3);
        assert_eq!(
            k.matrix,
            vec![
                vec![0.0, -1.0, 0.0],
                vec![-1.0, 4.0, -1.0],
                vec![0.0, -1.0, 0.0],
            ]
        );
        assert_eq!(k.divisor, 1.0);
    }

    #[test]
    fn test_laplacian_5_cross_pattern() {
        let k = laplacian(5);
        let center = 2;

        assert_eq!(k.get(center, center), 8.0);
        for i in 0..5 {
            for j in 0..5 {
                if i == center && j == center {
                    continue;
                }
                if i == center || j == center {
                    assert_eq!(k.get(i, j), -1.0, "cross cell ({i},{j})");
                } else {
                    assert_eq!(k.get(i, j), 0.0, "off-cross cell ({i},{j})");
                }
            }
        }
    }

    #[test]
    fn test_median_window_is_display_only() {
        let k = median_window(5);
        assert_eq!(k.divisor, 1.0);
        assert!(k.matrix.iter().flatten().all(|&w| w == 1.0));
    }

    #[test]
    fn test_preset_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_tag(preset.tag()), Some(preset));
        }
        assert_eq!(Preset::from_tag("custom"), None);
    }

    #[test]
    fn test_preset_filter_types() {
        assert_eq!(Preset::Median.filter_type(), FilterType::Median);
        assert_eq!(Preset::Average.filter_type(), FilterType::Convolution);
        assert_eq!(Preset::Laplacian.filter_type(), FilterType::Convolution);
    }

    proptest! {
        #[test]
        fn prop_average_weights_sum_to_divisor(i in 1usize..=4) {
            let size = 2 * i + 1;
            let k = average(size);
            prop_assert_eq!(k.weight_sum(), k.divisor);
        }

        #[test]
        fn prop_laplacian_weights_sum_to_zero(i in 1usize..=4) {
            let size = 2 * i + 1;
            let k = laplacian(size);
            // center weight balances the 2*(size-1) cross cells
            prop_assert_eq!(k.weight_sum(), 0.0);
        }
    }
}

//! Presentation-side rendering of remote results.
//!
//! Nothing here touches pixel semantics; these are pure view transforms
//! over buffers and bin counts the service already computed.

pub mod histogram;
pub mod raster;

// Re-export commonly used types
pub use histogram::{HistogramView, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use raster::{display_size, fit_within, to_rgba, DISPLAY_MAX_EDGE};

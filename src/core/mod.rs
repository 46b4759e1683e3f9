//! Core types for the pixelgraph editor core.
//!
//! This module contains the foundational pieces the rest of the crate builds
//! on:
//! - Value types (images, histograms, operation enums)
//! - Node and edge identifiers
//! - The full error taxonomy and the aggregate validation report

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{
    ClientError, Dimension, EdgeId, GraphError, NodeId, PixelGraphError, ValidationError,
    ValidationReport,
};
pub use types::{FilterType, HistogramData, ImageResult, PointOperation, HISTOGRAM_BINS};

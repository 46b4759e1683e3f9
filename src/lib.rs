//! # Pixelgraph - Visual Image-Processing Pipeline Core
//!
//! Pixelgraph is the editing core of a node-based image processing tool.
//! The user composes a pipeline from typed nodes, the graph is submitted to
//! an external processing service as one atomic exchange, and the per-node
//! results are folded back into the graph for display.
//!
//! ## Features
//!
//! - **Typed node payloads**: each node kind carries a distinct payload
//!   variant; updates dispatch by kind, never by field sniffing
//! - **Kernel synthesis**: averaging, Laplacian and median-window kernels
//!   for the convolution node
//! - **Exhaustive input validation**: every raw-input violation across the
//!   graph is collected into one report before anything is sent
//! - **Tolerant reconciliation**: service result tags are matched through an
//!   explicit compatibility table, not string equality
//! - **Presentation helpers**: grayscale-to-RGBA expansion and histogram
//!   bar rendering for the editing surface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pixelgraph::prelude::*;
//!
//! // Build a pipeline
//! let mut graph = Graph::new();
//! let reader = graph.add_node(NodeKind::RawReader);
//! let display = graph.add_node(NodeKind::Display);
//! graph.connect(&reader, None, &display, None).unwrap();
//!
//! // Load pixels into the reader
//! graph.update_payload(&reader, PayloadUpdate::RawReader(RawReaderPatch {
//!     width: Some(2),
//!     height: Some(2),
//!     image_data: Some(vec![10, 20, 30, 40]),
//!     filename: Some("tiny.raw".to_string()),
//! })).unwrap();
//!
//! // Submit and fold the results back in
//! let client = ProcessingClient::new();
//! let response = client.submit(&graph)?;
//! let graph = reconcile(&graph, &response);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: value types, identifiers and the error taxonomy
//! - [`kernel`]: pure kernel synthesis for the convolution node
//! - [`graph`]: the pipeline model, payloads and wire serialization
//! - [`validation`]: pre-submission input checking
//! - [`client`]: the exchange with the remote processing service
//! - [`reconcile`]: folding service results back into the graph
//! - [`render`]: presentation-side raster and histogram drawing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod core;
pub mod graph;
pub mod kernel;
pub mod reconcile;
pub mod render;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use pixelgraph::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{
        FilterType, HistogramData, ImageResult, PointOperation, HISTOGRAM_BINS,
    };

    // Errors
    pub use crate::core::error::{
        ClientError, Dimension, EdgeId, GraphError, NodeId, PixelGraphError, PixelGraphResult,
        ValidationError, ValidationReport,
    };

    // Kernels
    pub use crate::kernel::{average, laplacian, median_window, Kernel, Preset};

    // Graph
    pub use crate::graph::payload::{
        ConvolutionPatch, ConvolutionPayload, DifferencePatch, DisplayPatch, HistogramPatch,
        NodeKind, NodePayload, PayloadUpdate, PointOpPatch, PointOpPayload, RawReaderPatch,
        RawReaderPayload, SavePatch, SavePayload,
    };
    pub use crate::graph::serialization::{WireGraph, WireNode};
    pub use crate::graph::structure::{
        Edge, Graph, Node, Position, DIFFERENCE_INPUT_BOTTOM, DIFFERENCE_INPUT_TOP,
    };

    // Validation
    pub use crate::validation::validate_inputs;

    // Client
    pub use crate::client::http::{ProcessingClient, DEFAULT_BASE_URL};
    pub use crate::client::protocol::{
        HealthStatus, ProcessRequest, ProcessResponse, ResultEntry, ResultKind, UploadedImage,
    };

    // Reconciliation
    pub use crate::reconcile::{accepts, reconcile};

    // Rendering
    pub use crate::render::histogram::HistogramView;
    pub use crate::render::raster::{display_size, fit_within, to_rgba, DISPLAY_MAX_EDGE};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "pixelgraph");
    }

    #[test]
    fn test_basic_pipeline_construction() {
        let mut graph = Graph::new();

        let reader = graph.add_node(NodeKind::RawReader);
        let conv = graph.add_node(NodeKind::Convolution);
        let display = graph.add_node(NodeKind::Display);

        assert!(graph.connect(&reader, None, &conv, None).is_ok());
        assert!(graph.connect(&conv, None, &display, None).is_ok());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_end_to_end_reconciliation() {
        // graph with one raw reader feeding one display node
        let mut graph = Graph::new();
        let reader = graph.add_node(NodeKind::RawReader);
        let display = graph.add_node(NodeKind::Display);
        graph.connect(&reader, None, &display, None).unwrap();
        graph
            .update_payload(
                &reader,
                PayloadUpdate::RawReader(RawReaderPatch {
                    width: Some(2),
                    height: Some(2),
                    image_data: Some(vec![10, 20, 30, 40]),
                    filename: None,
                }),
            )
            .unwrap();
        assert!(validate_inputs(&graph).can_submit());

        // the response the service would send for this graph
        let body = format!(
            r#"{{"results": {{"{display}": {{
                "type": "image", "width": 2, "height": 2, "data": [10, 20, 30, 40]
            }}}}}}"#
        );
        let response: ProcessResponse = serde_json::from_str(&body).unwrap();

        let updated = reconcile(&graph, &response);
        match updated.get_node(&display).unwrap().payload() {
            NodePayload::Display(p) => {
                let image = p.image_data.as_ref().unwrap();
                assert_eq!((image.width, image.height), (2, 2));
                assert_eq!(image.data, vec![10, 20, 30, 40]);
            }
            _ => panic!("wrong payload kind"),
        }
    }
}

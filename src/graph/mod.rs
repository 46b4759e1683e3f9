//! Graph module for the pipeline being edited.
//!
//! A pipeline is a directed graph where nodes carry typed payloads and edges
//! describe data flow. The structure is intentionally permissive; all pixel
//! work happens in the remote service, so the graph only has to stay
//! consistent enough to serialize.

pub mod payload;
pub mod serialization;
pub mod structure;

// Re-export commonly used types
pub use payload::{
    ConvolutionPatch, ConvolutionPayload, DifferencePatch, DifferencePayload, DisplayPatch,
    DisplayPayload, HistogramPatch, HistogramPayload, NodeKind, NodePayload, PayloadUpdate,
    PointOpPatch, PointOpPayload, RawReaderPatch, RawReaderPayload, SavePatch, SavePayload,
};
pub use serialization::{WireGraph, WireNode};
pub use structure::{
    Edge, Graph, IdGenerator, Node, Position, DIFFERENCE_INPUT_BOTTOM, DIFFERENCE_INPUT_TOP,
};

//! Request and response shapes for the remote processing service.
//!
//! The service is permissive about what it returns per node: entries may be
//! tagged with a different kind than the requesting node (a display node's
//! result arrives as `"image"` or `"display"`), histogram counts travel in
//! the generic `data` field, and a failed node may be a bare `{"error": ..}`
//! object with no tag at all. Everything here decodes tolerantly and leaves
//! the compatibility policy to the reconciler.

use crate::core::error::NodeId;
use crate::core::types::{HistogramData, ImageResult, HISTOGRAM_BINS};
use crate::graph::payload::RawReaderPatch;
use crate::graph::serialization::{WireGraph, WireNode};
use crate::graph::structure::{Edge, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub nodes: Vec<WireNode>,
    pub edges: Vec<Edge>,
}

impl ProcessRequest {
    /// Snapshot a graph into a request body.
    ///
    /// When several edges land on the same `(target, targetHandle)` pair the
    /// last one added wins; earlier ones are dropped from the request so the
    /// service sees at most one producer per input.
    pub fn from_graph(graph: &Graph) -> Result<Self, serde_json::Error> {
        let wire = WireGraph::from_graph(graph)?;

        let mut edges: Vec<Edge> = Vec::with_capacity(wire.edges.len());
        for edge in wire.edges.into_iter().rev() {
            let taken = edges
                .iter()
                .any(|kept| kept.target == edge.target && kept.target_handle == edge.target_handle);
            if !taken {
                edges.push(edge);
            }
        }
        edges.reverse();

        Ok(Self {
            nodes: wire.nodes,
            edges,
        })
    }
}

/// Kind tag the service attaches to a result entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Image,
    Histogram,
    Display,
    Save,
    Error,
    /// Any tag this build does not know. Entries with an unknown tag are
    /// skipped by the reconciler rather than failing the whole response.
    #[serde(other)]
    Unknown,
}

/// One per-node entry in the `results` mapping.
///
/// All fields are optional on the wire; which ones are meaningful depends on
/// the kind tag and the node being reconciled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultEntry {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResultKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Pixel bytes for image-family entries, bin counts for histograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u64>>,
    /// Nested image object some save entries carry instead of flat fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEntry {
    /// Extract an image buffer, preferring the nested `image` object over
    /// the flat `width`/`height`/`data` fields.
    pub fn image_result(&self) -> Option<ImageResult> {
        if let Some(image) = &self.image {
            return Some(image.clone());
        }
        let (width, height, data) = (self.width?, self.height?, self.data.as_ref()?);
        Some(ImageResult::new(
            width,
            height,
            data.iter().map(|&v| v as u8).collect(),
        ))
    }

    /// Extract histogram bins from either the `histogram` or `data` field.
    /// Returns `None` unless exactly [`HISTOGRAM_BINS`] counts are present.
    pub fn histogram_data(&self) -> Option<HistogramData> {
        let counts = self.histogram.as_ref().or(self.data.as_ref())?;
        if counts.len() != HISTOGRAM_BINS {
            return None;
        }
        HistogramData::new(counts.clone())
    }
}

/// Body of a `POST /process` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessResponse {
    pub results: HashMap<NodeId, ResultEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a `POST /upload-raw` response.
///
/// The service is authoritative about dimensions: whatever hints went up in
/// the query string, the values here are the ones the node must adopt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl From<&UploadedImage> for RawReaderPatch {
    fn from(upload: &UploadedImage) -> Self {
        RawReaderPatch {
            width: Some(upload.width),
            height: Some(upload.height),
            image_data: Some(upload.data.clone()),
            filename: None,
        }
    }
}

/// Body of a `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok" || self.status == "healthy"
    }
}

//! Node kinds and their tagged-union payloads.
//!
//! Every node kind carries a distinct payload variant, never a generic bag
//! of fields: dispatch is an exhaustive match, and a payload's shape is
//! fixed by the node's kind at creation time. Partial updates go through
//! the parallel patch types, which shallow-merge field by field (nested
//! arrays such as the kernel matrix are replaced wholesale, never merged).

use crate::core::types::{FilterType, HistogramData, ImageResult, PointOperation};
use crate::kernel::{self, Preset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven node kinds of the processing graph.
///
/// A node's kind is immutable after creation and determines its payload
/// shape. Wire names are the SCREAMING_SNAKE tags the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    RawReader,
    Convolution,
    PointOp,
    Display,
    Histogram,
    Difference,
    Save,
}

impl NodeKind {
    /// All kinds in toolbar order.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::RawReader,
        NodeKind::Convolution,
        NodeKind::PointOp,
        NodeKind::Display,
        NodeKind::Histogram,
        NodeKind::Difference,
        NodeKind::Save,
    ];

    /// Wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::RawReader => "RAW_READER",
            NodeKind::Convolution => "CONVOLUTION",
            NodeKind::PointOp => "POINT_OP",
            NodeKind::Display => "DISPLAY",
            NodeKind::Histogram => "HISTOGRAM",
            NodeKind::Difference => "DIFFERENCE",
            NodeKind::Save => "SAVE",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Parameters and loaded data for a raw-image source node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawReaderPayload {
    /// Declared width; advisory until the upload service confirms it.
    pub width: u32,
    /// Declared height; advisory until the upload service confirms it.
    pub height: u32,
    /// Loaded intensity samples, one byte per pixel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
    /// Name of the loaded file, for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Default for RawReaderPayload {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            image_data: None,
            filename: None,
        }
    }
}

/// Kernel parameters for a convolution node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvolutionPayload {
    /// Odd window size; the editing surface offers 3, 5, 7 and 9.
    pub kernel_size: usize,
    /// Square weight matrix, `kernel_size` x `kernel_size`.
    pub kernel: Vec<Vec<f64>>,
    /// Normalization divisor; meaningless under the median filter.
    pub divisor: f64,
    /// Preset tag the kernel was synthesized from.
    pub preset: String,
    /// Whether the service convolves or takes the window median.
    pub filter_type: FilterType,
}

impl Default for ConvolutionPayload {
    fn default() -> Self {
        let k = kernel::average(3);
        Self {
            kernel_size: k.size,
            kernel: k.matrix,
            divisor: k.divisor,
            preset: Preset::Average.tag().to_string(),
            filter_type: FilterType::Convolution,
        }
    }
}

impl ConvolutionPayload {
    /// Build a payload from a preset at a given window size.
    pub fn from_preset(preset: Preset, size: usize) -> Self {
        let k = preset.kernel(size);
        Self {
            kernel_size: k.size,
            kernel: k.matrix,
            divisor: k.divisor,
            preset: preset.tag().to_string(),
            filter_type: preset.filter_type(),
        }
    }
}

/// Parameters for a per-pixel point operation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointOpPayload {
    pub operation: PointOperation,
    pub value: f64,
}

impl Default for PointOpPayload {
    fn default() -> Self {
        Self {
            operation: PointOperation::Brightness,
            value: PointOperation::Brightness.default_value(),
        }
    }
}

/// Resolved image for a display node, populated after a successful run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<ImageResult>,
}

/// Resolved histogram for a histogram node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramData>,
}

/// Resolved difference image for a two-input difference node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferencePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ImageResult>,
}

/// Target filename and resolved image for a save node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavePayload {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<ImageResult>,
}

impl Default for SavePayload {
    fn default() -> Self {
        Self {
            filename: "output.raw".to_string(),
            image_data: None,
        }
    }
}

/// The tagged union of all node payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodePayload {
    RawReader(RawReaderPayload),
    Convolution(ConvolutionPayload),
    PointOp(PointOpPayload),
    Display(DisplayPayload),
    Histogram(HistogramPayload),
    Difference(DifferencePayload),
    Save(SavePayload),
}

impl NodePayload {
    /// Default payload for a freshly created node of the given kind.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::RawReader => NodePayload::RawReader(RawReaderPayload::default()),
            NodeKind::Convolution => NodePayload::Convolution(ConvolutionPayload::default()),
            NodeKind::PointOp => NodePayload::PointOp(PointOpPayload::default()),
            NodeKind::Display => NodePayload::Display(DisplayPayload::default()),
            NodeKind::Histogram => NodePayload::Histogram(HistogramPayload::default()),
            NodeKind::Difference => NodePayload::Difference(DifferencePayload::default()),
            NodeKind::Save => NodePayload::Save(SavePayload::default()),
        }
    }

    /// Decode a payload from its wire `data` object, directed by the node's
    /// kind tag.
    ///
    /// The untagged union cannot self-identify on the way in: payloads that
    /// serialize to `{}` would all match the first defaultable variant. Every
    /// decode path therefore goes through here, with the kind supplied from
    /// the node alongside the data.
    pub fn decode(kind: NodeKind, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            NodeKind::RawReader => NodePayload::RawReader(serde_json::from_value(data)?),
            NodeKind::Convolution => NodePayload::Convolution(serde_json::from_value(data)?),
            NodeKind::PointOp => NodePayload::PointOp(serde_json::from_value(data)?),
            NodeKind::Display => NodePayload::Display(serde_json::from_value(data)?),
            NodeKind::Histogram => NodePayload::Histogram(serde_json::from_value(data)?),
            NodeKind::Difference => NodePayload::Difference(serde_json::from_value(data)?),
            NodeKind::Save => NodePayload::Save(serde_json::from_value(data)?),
        })
    }

    /// The kind this payload belongs to.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::RawReader(_) => NodeKind::RawReader,
            NodePayload::Convolution(_) => NodeKind::Convolution,
            NodePayload::PointOp(_) => NodeKind::PointOp,
            NodePayload::Display(_) => NodeKind::Display,
            NodePayload::Histogram(_) => NodeKind::Histogram,
            NodePayload::Difference(_) => NodeKind::Difference,
            NodePayload::Save(_) => NodeKind::Save,
        }
    }

    /// Shallow-merge a patch into this payload.
    ///
    /// Returns `false` when the patch targets a different kind, in which
    /// case the payload is left untouched.
    pub fn apply(&mut self, update: &PayloadUpdate) -> bool {
        match (self, update) {
            (NodePayload::RawReader(p), PayloadUpdate::RawReader(u)) => {
                if let Some(width) = u.width {
                    p.width = width;
                }
                if let Some(height) = u.height {
                    p.height = height;
                }
                if let Some(data) = &u.image_data {
                    p.image_data = Some(data.clone());
                }
                if let Some(filename) = &u.filename {
                    p.filename = Some(filename.clone());
                }
                true
            }
            (NodePayload::Convolution(p), PayloadUpdate::Convolution(u)) => {
                if let Some(size) = u.kernel_size {
                    p.kernel_size = size;
                }
                // wholesale replacement, never a deep merge
                if let Some(kernel) = &u.kernel {
                    p.kernel = kernel.clone();
                }
                if let Some(divisor) = u.divisor {
                    p.divisor = divisor;
                }
                if let Some(preset) = &u.preset {
                    p.preset = preset.clone();
                }
                if let Some(filter_type) = u.filter_type {
                    p.filter_type = filter_type;
                }
                true
            }
            (NodePayload::PointOp(p), PayloadUpdate::PointOp(u)) => {
                if let Some(operation) = u.operation {
                    p.operation = operation;
                }
                if let Some(value) = u.value {
                    p.value = value;
                }
                true
            }
            (NodePayload::Display(p), PayloadUpdate::Display(u)) => {
                if let Some(image) = &u.image_data {
                    p.image_data = Some(image.clone());
                }
                true
            }
            (NodePayload::Histogram(p), PayloadUpdate::Histogram(u)) => {
                if let Some(histogram) = &u.histogram {
                    p.histogram = Some(histogram.clone());
                }
                true
            }
            (NodePayload::Difference(p), PayloadUpdate::Difference(u)) => {
                if let Some(result) = &u.result {
                    p.result = Some(result.clone());
                }
                true
            }
            (NodePayload::Save(p), PayloadUpdate::Save(u)) => {
                if let Some(filename) = &u.filename {
                    p.filename = filename.clone();
                }
                if let Some(image) = &u.image_data {
                    p.image_data = Some(image.clone());
                }
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Patches
// ============================================================================

/// Partial update for a raw reader payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReaderPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub image_data: Option<Vec<u8>>,
    pub filename: Option<String>,
}

/// Partial update for a convolution payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvolutionPatch {
    pub kernel_size: Option<usize>,
    pub kernel: Option<Vec<Vec<f64>>>,
    pub divisor: Option<f64>,
    pub preset: Option<String>,
    pub filter_type: Option<FilterType>,
}

impl ConvolutionPatch {
    /// Patch switching a node to a preset at a given window size,
    /// regenerating kernel, divisor and filter type together.
    pub fn from_preset(preset: Preset, size: usize) -> Self {
        let k = preset.kernel(size);
        Self {
            kernel_size: Some(k.size),
            kernel: Some(k.matrix),
            divisor: Some(k.divisor),
            preset: Some(preset.tag().to_string()),
            filter_type: Some(preset.filter_type()),
        }
    }
}

/// Partial update for a point operation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOpPatch {
    pub operation: Option<PointOperation>,
    pub value: Option<f64>,
}

/// Partial update for a display payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPatch {
    pub image_data: Option<ImageResult>,
}

/// Partial update for a histogram payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramPatch {
    pub histogram: Option<HistogramData>,
}

/// Partial update for a difference payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferencePatch {
    pub result: Option<ImageResult>,
}

/// Partial update for a save payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePatch {
    pub filename: Option<String>,
    pub image_data: Option<ImageResult>,
}

/// A kind-tagged partial payload update.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadUpdate {
    RawReader(RawReaderPatch),
    Convolution(ConvolutionPatch),
    PointOp(PointOpPatch),
    Display(DisplayPatch),
    Histogram(HistogramPatch),
    Difference(DifferencePatch),
    Save(SavePatch),
}

impl PayloadUpdate {
    /// The node kind this update targets.
    pub fn kind(&self) -> NodeKind {
        match self {
            PayloadUpdate::RawReader(_) => NodeKind::RawReader,
            PayloadUpdate::Convolution(_) => NodeKind::Convolution,
            PayloadUpdate::PointOp(_) => NodeKind::PointOp,
            PayloadUpdate::Display(_) => NodeKind::Display,
            PayloadUpdate::Histogram(_) => NodeKind::Histogram,
            PayloadUpdate::Difference(_) => NodeKind::Difference,
            PayloadUpdate::Save(_) => NodeKind::Save,
        }
    }

    /// Convenience patch setting only a point operation's value.
    pub fn point_op_value(value: f64) -> Self {
        PayloadUpdate::PointOp(PointOpPatch {
            value: Some(value),
            ..PointOpPatch::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&NodeKind::RawReader).unwrap(),
            "\"RAW_READER\""
        );
        assert_eq!(
            serde_json::to_string(&NodeKind::PointOp).unwrap(),
            "\"POINT_OP\""
        );
        for kind in NodeKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: NodeKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_default_payload_matches_kind() {
        for kind in NodeKind::ALL {
            assert_eq!(NodePayload::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_convolution_defaults() {
        let p = ConvolutionPayload::default();
        assert_eq!(p.kernel_size, 3);
        assert_eq!(p.divisor, 9.0);
        assert_eq!(p.preset, "average");
        assert_eq!(p.filter_type, FilterType::Convolution);
    }

    #[test]
    fn test_point_op_patch_preserves_operation() {
        let mut payload = NodePayload::PointOp(PointOpPayload {
            operation: PointOperation::Threshold,
            value: 128.0,
        });

        assert!(payload.apply(&PayloadUpdate::point_op_value(50.0)));

        match payload {
            NodePayload::PointOp(p) => {
                assert_eq!(p.value, 50.0);
                assert_eq!(p.operation, PointOperation::Threshold);
            }
            _ => panic!("payload changed kind"),
        }
    }

    #[test]
    fn test_kernel_replaced_wholesale() {
        let mut payload = NodePayload::Convolution(ConvolutionPayload::from_preset(
            Preset::Average,
            5,
        ));

        let patch = ConvolutionPatch {
            kernel: Some(vec![vec![2.0; 3]; 3]),
            kernel_size: Some(3),
            ..ConvolutionPatch::default()
        };
        assert!(payload.apply(&PayloadUpdate::Convolution(patch)));

        match payload {
            NodePayload::Convolution(p) => {
                assert_eq!(p.kernel, vec![vec![2.0; 3]; 3]);
                assert_eq!(p.kernel_size, 3);
                // untouched fields survive the merge
                assert_eq!(p.preset, "average");
                assert_eq!(p.divisor, 25.0);
            }
            _ => panic!("payload changed kind"),
        }
    }

    #[test]
    fn test_mismatched_patch_rejected() {
        let mut payload = NodePayload::default_for(NodeKind::Display);
        let before = payload.clone();

        assert!(!payload.apply(&PayloadUpdate::point_op_value(1.0)));
        assert_eq!(payload, before);
    }

    #[test]
    fn test_preset_patch_regenerates_kernel() {
        let patch = ConvolutionPatch::from_preset(Preset::Laplacian, 5);
        assert_eq!(patch.divisor, Some(1.0));
        assert_eq!(patch.filter_type, Some(FilterType::Convolution));
        let kernel = patch.kernel.unwrap();
        assert_eq!(kernel[2][2], 8.0);
    }

    #[test]
    fn test_camel_case_wire_fields() {
        let p = ConvolutionPayload::default();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("kernelSize").is_some());
        assert!(json.get("filterType").is_some());

        let raw = RawReaderPayload {
            image_data: Some(vec![1, 2, 3]),
            ..RawReaderPayload::default()
        };
        let json = serde_json::to_value(&raw).unwrap();
        assert!(json.get("imageData").is_some());
    }
}

//! Result reconciliation.
//!
//! After a successful submission the service's per-node results are folded
//! back into the graph's sink payloads. The service's kind tags do not
//! always match the requesting node's kind (a display result may arrive
//! tagged `"image"` or `"display"`), so acceptance goes through an explicit
//! compatibility table instead of string equality.
//!
//! Reconciliation is pure with respect to its input: it clones the graph and
//! returns the updated copy, leaving the submitted snapshot untouched.

use crate::client::protocol::{ProcessResponse, ResultEntry, ResultKind};
use crate::graph::payload::{
    DifferencePatch, DisplayPatch, HistogramPatch, NodeKind, PayloadUpdate, SavePatch,
};
use crate::graph::structure::Graph;
use log::{debug, warn};

/// Which result kinds each sink node kind accepts.
///
/// An entry whose tag is absent from its node's row is skipped silently, as
/// are entries with no tag at all and kinds unknown to this build.
pub const COMPATIBILITY: [(NodeKind, &[ResultKind]); 4] = [
    (NodeKind::Display, &[ResultKind::Image, ResultKind::Display]),
    (NodeKind::Histogram, &[ResultKind::Histogram]),
    (NodeKind::Save, &[ResultKind::Save]),
    (NodeKind::Difference, &[ResultKind::Image, ResultKind::Display]),
];

/// Whether a sink node kind accepts a result entry's kind tag.
pub fn accepts(node_kind: NodeKind, result_kind: ResultKind) -> bool {
    COMPATIBILITY
        .iter()
        .any(|(kind, accepted)| *kind == node_kind && accepted.contains(&result_kind))
}

/// Fold a processing response into a copy of the graph.
///
/// Nodes without an entry keep their payload; an intermediate node with no
/// terminal sink simply yields no result. Entries carrying a service-side
/// `error` are logged and skipped, never applied partially.
pub fn reconcile(graph: &Graph, response: &ProcessResponse) -> Graph {
    let mut updated = graph.clone();
    let mut applied = 0usize;

    for node in graph.nodes() {
        let Some(entry) = response.results.get(&node.id) else {
            continue;
        };

        if let Some(message) = &entry.error {
            warn!("node {} failed remotely: {}", node.id, message);
            continue;
        }

        let Some(update) = extract(node.kind(), entry) else {
            continue;
        };

        // the node exists and the update kind matches by construction
        if updated.update_payload(&node.id, update).is_ok() {
            applied += 1;
        }
    }

    debug!(
        "reconciled {} of {} result entr(ies)",
        applied,
        response.results.len()
    );
    updated
}

fn extract(node_kind: NodeKind, entry: &ResultEntry) -> Option<PayloadUpdate> {
    let result_kind = entry.kind?;
    if !accepts(node_kind, result_kind) {
        return None;
    }

    match node_kind {
        NodeKind::Display => Some(PayloadUpdate::Display(DisplayPatch {
            image_data: Some(entry.image_result()?),
        })),
        NodeKind::Histogram => Some(PayloadUpdate::Histogram(HistogramPatch {
            histogram: Some(entry.histogram_data()?),
        })),
        NodeKind::Save => Some(PayloadUpdate::Save(SavePatch {
            filename: entry.filename.clone(),
            image_data: Some(entry.image_result()?),
        })),
        NodeKind::Difference => Some(PayloadUpdate::Difference(DifferencePatch {
            result: Some(entry.image_result()?),
        })),
        _ => None,
    }
}

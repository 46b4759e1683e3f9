//! Pre-submission input validation.
//!
//! Runs before every submission. Only raw reader nodes are checked; every
//! other kind is filled in by the service and has nothing to validate
//! locally. Validation is exhaustive, not fail-fast: every violation across
//! every raw reader node is collected into one [`ValidationReport`] so the
//! user can fix all problems in one pass. Each failing axis and each failing
//! check counts separately, one message per problem.

use crate::core::error::{Dimension, ValidationError, ValidationReport};
use crate::graph::payload::{NodePayload, RawReaderPayload};
use crate::graph::structure::{Graph, Node};
use log::debug;

/// Validate every raw reader input in the graph.
///
/// A non-empty report means submission must be aborted; no partial request
/// is ever sent.
pub fn validate_inputs(graph: &Graph) -> ValidationReport {
    let mut report = ValidationReport::new();

    for node in graph.nodes() {
        if let NodePayload::RawReader(payload) = node.payload() {
            check_raw_reader(node, payload, &mut report);
        }
    }

    debug!(
        "validated {} node(s), {} violation(s)",
        graph.node_count(),
        report.len()
    );
    report
}

fn check_raw_reader(node: &Node, payload: &RawReaderPayload, report: &mut ValidationReport) {
    if payload.image_data.is_none() {
        report.add_error(ValidationError::MissingImage {
            node_id: node.id.clone(),
        });
    }

    if payload.width == 0 {
        report.add_error(ValidationError::InvalidDimension {
            node_id: node.id.clone(),
            dimension: Dimension::Width,
            value: payload.width,
        });
    }
    if payload.height == 0 {
        report.add_error(ValidationError::InvalidDimension {
            node_id: node.id.clone(),
            dimension: Dimension::Height,
            value: payload.height,
        });
    }

    let Some(data) = payload.image_data.as_ref() else {
        return;
    };

    if data.is_empty() {
        report.add_error(ValidationError::EmptyImage {
            node_id: node.id.clone(),
        });
        return;
    }

    let expected = payload.width as usize * payload.height as usize;
    if expected != data.len() {
        report.add_error(ValidationError::DimensionMismatch {
            node_id: node.id.clone(),
            expected,
            actual: data.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::payload::{NodeKind, PayloadUpdate, RawReaderPatch};

    fn reader_with(
        graph: &mut Graph,
        width: u32,
        height: u32,
        data: Option<Vec<u8>>,
    ) -> crate::core::NodeId {
        let id = graph.add_node(NodeKind::RawReader);
        graph
            .update_payload(
                &id,
                PayloadUpdate::RawReader(RawReaderPatch {
                    width: Some(width),
                    height: Some(height),
                    image_data: data,
                    filename: None,
                }),
            )
            .unwrap();
        id
    }

    #[test]
    fn test_valid_input_passes() {
        let mut graph = Graph::new();
        reader_with(&mut graph, 2, 2, Some(vec![10, 20, 30, 40]));

        let report = validate_inputs(&graph);
        assert!(report.can_submit());
    }

    #[test]
    fn test_dimension_mismatch_reports_counts() {
        let mut graph = Graph::new();
        let id = reader_with(&mut graph, 4, 4, Some(vec![0; 15]));

        let report = validate_inputs(&graph);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.errors[0],
            ValidationError::DimensionMismatch {
                node_id: id,
                expected: 16,
                actual: 15,
            }
        );
    }

    #[test]
    fn test_fully_unconfigured_node_yields_three_messages() {
        let mut graph = Graph::new();
        reader_with(&mut graph, 0, 0, None);

        let report = validate_inputs(&graph);
        assert_eq!(report.len(), 3);
        assert!(matches!(
            report.errors[0],
            ValidationError::MissingImage { .. }
        ));
        assert!(matches!(
            report.errors[1],
            ValidationError::InvalidDimension {
                dimension: Dimension::Width,
                ..
            }
        ));
        assert!(matches!(
            report.errors[2],
            ValidationError::InvalidDimension {
                dimension: Dimension::Height,
                ..
            }
        ));
    }

    #[test]
    fn test_violations_aggregate_across_nodes() {
        let mut graph = Graph::new();
        reader_with(&mut graph, 0, 0, None); // 3 violations
        reader_with(&mut graph, 4, 4, Some(vec![0; 15])); // 1 violation
        reader_with(&mut graph, 2, 2, Some(vec![])); // 1 violation
        graph.add_node(NodeKind::Display); // not checked

        let report = validate_inputs(&graph);
        assert_eq!(report.len(), 5);
        assert!(!report.can_submit());
    }

    #[test]
    fn test_empty_image_skips_mismatch_check() {
        let mut graph = Graph::new();
        reader_with(&mut graph, 2, 2, Some(vec![]));

        let report = validate_inputs(&graph);
        assert_eq!(report.len(), 1);
        assert!(matches!(
            report.errors[0],
            ValidationError::EmptyImage { .. }
        ));
    }

    #[test]
    fn test_non_reader_nodes_are_ignored() {
        let mut graph = Graph::new();
        graph.add_node(NodeKind::Display);
        graph.add_node(NodeKind::Histogram);
        graph.add_node(NodeKind::Save);

        assert!(validate_inputs(&graph).can_submit());
    }
}

//! Wire-shape graph representation.
//!
//! The processing service and graph files both speak the flat shape the
//! original canvas toolkit emits: nodes as `{id, type, position, data}`
//! and edges as `{id, source, sourceHandle, target, targetHandle}`. The
//! payload inside `data` is untyped on the wire; decoding picks the variant
//! from the sibling `type` tag.

use crate::core::error::NodeId;
use crate::graph::payload::{NodeKind, NodePayload};
use crate::graph::structure::{Edge, Graph, Node, Position};
use serde::{Deserialize, Serialize};

/// Serializable representation of one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: serde_json::Value,
}

impl WireNode {
    /// Flatten a typed node into its wire shape.
    pub fn from_node(node: &Node) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: node.id.clone(),
            kind: node.kind(),
            position: node.position,
            data: serde_json::to_value(node.payload())?,
        })
    }

    /// Rebuild the typed node, decoding `data` by the `type` tag.
    pub fn into_node(self) -> Result<Node, serde_json::Error> {
        let payload = NodePayload::decode(self.kind, self.data)?;
        Ok(Node::with_payload(self.id, self.position, payload))
    }
}

/// Serializable representation of a complete graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireGraph {
    pub nodes: Vec<WireNode>,
    pub edges: Vec<Edge>,
}

impl WireGraph {
    /// Flatten a typed graph.
    pub fn from_graph(graph: &Graph) -> Result<Self, serde_json::Error> {
        Ok(Self {
            nodes: graph
                .nodes()
                .map(WireNode::from_node)
                .collect::<Result<_, _>>()?,
            edges: graph.edges().to_vec(),
        })
    }

    /// Rebuild a typed graph, resyncing the id counters past any
    /// counter-style ids so later additions do not collide.
    pub fn into_graph(self) -> Result<Graph, serde_json::Error> {
        let mut graph = Graph::new();
        for wire_node in self.nodes {
            graph.insert_node(wire_node.into_node()?);
        }
        for edge in self.edges {
            graph.insert_edge(edge);
        }
        graph.resync_id_counters();
        Ok(graph)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::payload::PayloadUpdate;
    use crate::graph::structure::DIFFERENCE_INPUT_TOP;

    #[test]
    fn test_wire_node_shape() {
        let mut graph = Graph::new();
        let id = graph.add_node(NodeKind::Convolution);

        let wire = WireNode::from_node(graph.get_node(&id).unwrap()).unwrap();
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["id"], "node_0");
        assert_eq!(json["type"], "CONVOLUTION");
        assert!(json["position"]["x"].is_number());
        assert_eq!(json["data"]["kernelSize"], 3);
    }

    #[test]
    fn test_edge_wire_shape() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::RawReader);
        let d = graph.add_node(NodeKind::Difference);
        graph
            .connect(&a, None, &d, Some(DIFFERENCE_INPUT_TOP))
            .unwrap();

        let json = serde_json::to_value(&graph.edges()[0]).unwrap();
        assert_eq!(json["source"], "node_0");
        assert_eq!(json["target"], "node_1");
        assert_eq!(json["targetHandle"], "input1");
        assert!(json.get("sourceHandle").is_none());
    }

    #[test]
    fn test_graph_round_trip() {
        let mut graph = Graph::new();
        let reader = graph.add_node(NodeKind::RawReader);
        let display = graph.add_node(NodeKind::Display);
        graph.connect(&reader, None, &display, None).unwrap();
        graph
            .update_payload(
                &reader,
                PayloadUpdate::RawReader(crate::graph::payload::RawReaderPatch {
                    width: Some(2),
                    height: Some(2),
                    image_data: Some(vec![10, 20, 30, 40]),
                    filename: Some("test.raw".to_string()),
                }),
            )
            .unwrap();

        let json = WireGraph::from_graph(&graph).unwrap().to_json().unwrap();
        let rebuilt = WireGraph::from_json(&json).unwrap().into_graph().unwrap();

        assert_eq!(rebuilt.node_count(), 2);
        assert_eq!(rebuilt.edge_count(), 1);
        let node = rebuilt.get_node(&reader).unwrap();
        assert_eq!(node.kind(), NodeKind::RawReader);
        match node.payload() {
            NodePayload::RawReader(p) => {
                assert_eq!(p.image_data.as_deref(), Some(&[10, 20, 30, 40][..]));
            }
            _ => panic!("wrong payload kind"),
        }

        // counters continue past loaded ids
        let mut rebuilt = rebuilt;
        assert_eq!(rebuilt.add_node(NodeKind::Save).as_str(), "node_2");
    }

    #[test]
    fn test_decode_tolerates_sparse_data() {
        // fresh nodes from the canvas may carry an empty data object
        let wire = WireNode {
            id: NodeId::from("node_7"),
            kind: NodeKind::RawReader,
            position: Position::default(),
            data: serde_json::json!({}),
        };
        let node = wire.into_node().unwrap();
        match node.payload() {
            NodePayload::RawReader(p) => {
                assert_eq!(p.width, 512);
                assert!(p.image_data.is_none());
            }
            _ => panic!("wrong payload kind"),
        }
    }
}

//! Graph structure and node management.
//!
//! The Graph is the central data structure of the editing session. It uses
//! a centralized approach for:
//! - Easy serialization into the processing request
//! - Graph-wide validation before submission
//! - Cheap snapshotting (reconciliation produces a new Graph)
//!
//! Mutations are synchronous and immediately observable; the core is
//! single-writer, so no batching or transactions are needed.

use crate::core::error::{EdgeId, GraphError, GraphResult, NodeId};
use crate::graph::payload::{NodeKind, NodePayload, PayloadUpdate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Position of a node on the canvas (presentation only).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Monotonic id source owned by a single graph.
///
/// Each graph carries its own generator instead of a process-global
/// counter, so concurrent sessions never hand out colliding ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGenerator {
    next_node: u64,
    next_edge: u64,
}

impl IdGenerator {
    /// Create a generator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next node id.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId::from_index(self.next_node);
        self.next_node += 1;
        id
    }

    /// Next edge id.
    pub fn next_edge_id(&mut self) -> EdgeId {
        let id = EdgeId::from_index(self.next_edge);
        self.next_edge += 1;
        id
    }

    /// Reset both counters to zero.
    pub fn reset(&mut self) {
        self.next_node = 0;
        self.next_edge = 0;
    }

    fn reserve_node(&mut self, index: u64) {
        self.next_node = self.next_node.max(index + 1);
    }

    fn reserve_edge(&mut self, index: u64) {
        self.next_edge = self.next_edge.max(index + 1);
    }
}

/// A typed node of the processing graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique within the owning graph.
    pub id: NodeId,
    /// Immutable after creation; fixes the payload shape.
    kind: NodeKind,
    /// Canvas position, ignored by the processing service.
    pub position: Position,
    payload: NodePayload,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            payload: NodePayload::default_for(kind),
        }
    }

    pub(crate) fn with_payload(
        id: NodeId,
        position: Position,
        payload: NodePayload,
    ) -> Self {
        Self {
            id,
            kind: payload.kind(),
            position,
            payload,
        }
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's payload.
    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut NodePayload {
        &mut self.payload
    }
}

// The payload union is untagged on the wire, so a derived Deserialize would
// pick whichever variant matches the raw fields first and could re-tag an
// empty payload. Decoding is directed by the serialized kind instead.
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Parts {
            id: NodeId,
            kind: NodeKind,
            position: Position,
            payload: serde_json::Value,
        }

        let parts = Parts::deserialize(deserializer)?;
        let payload =
            NodePayload::decode(parts.kind, parts.payload).map_err(serde::de::Error::custom)?;
        Ok(Node {
            id: parts.id,
            kind: parts.kind,
            position: parts.position,
            payload,
        })
    }
}

/// A directed connection from a source node's output to a target node's
/// input port ("handle").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Target handle name for a difference node's top input port.
pub const DIFFERENCE_INPUT_TOP: &str = "input1";
/// Target handle name for a difference node's bottom input port.
pub const DIFFERENCE_INPUT_BOTTOM: &str = "input2";

/// The editing session's node/edge collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    ids: IdGenerator,
}

impl Graph {
    /// Create a new empty graph with a fresh id generator.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node Management
    // ========================================================================

    /// Add a node of the given kind with its default payload.
    ///
    /// Nodes are placed on a deterministic grid; the canvas widget is free
    /// to move them afterwards.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len() as u64;
        let position = Position::new(
            100.0 + 160.0 * (index % 5) as f64,
            100.0 + 120.0 * (index / 5) as f64,
        );
        self.add_node_at(kind, position)
    }

    /// Add a node of the given kind at an explicit position.
    pub fn add_node_at(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = self.ids.next_node_id();
        self.nodes
            .insert(id.clone(), Node::new(id.clone(), kind, position));
        id
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Get a reference to a node.
    pub fn get_node(&self, id: &NodeId) -> GraphResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    pub(crate) fn get_node_mut(&mut self, id: &NodeId) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    /// Check if a node exists.
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node ids.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Update a node's payload by shallow-merging a patch.
    ///
    /// Fields the patch does not mention are preserved; nested arrays such
    /// as a kernel matrix are replaced wholesale. A patch for a different
    /// kind is rejected without touching the node.
    pub fn update_payload(&mut self, id: &NodeId, update: PayloadUpdate) -> GraphResult<()> {
        let node = self.get_node_mut(id)?;
        if node.payload_mut().apply(&update) {
            Ok(())
        } else {
            Err(GraphError::PayloadKindMismatch {
                node_id: id.clone(),
                expected: update.kind().to_string(),
                actual: node.kind().to_string(),
            })
        }
    }

    // ========================================================================
    // Edge Management
    // ========================================================================

    /// Connect a source node's output to a target node's input handle.
    ///
    /// Only existence of the endpoints is checked here: cycles are not
    /// rejected at this layer, and a second edge into an occupied handle is
    /// allowed — the request builder resolves that conflict last-wins.
    pub fn connect(
        &mut self,
        source: &NodeId,
        source_handle: Option<&str>,
        target: &NodeId,
        target_handle: Option<&str>,
    ) -> GraphResult<EdgeId> {
        self.get_node(source)?;
        self.get_node(target)?;

        let id = self.ids.next_edge_id();
        self.edges.push(Edge {
            id: id.clone(),
            source: source.clone(),
            source_handle: source_handle.map(str::to_string),
            target: target.clone(),
            target_handle: target_handle.map(str::to_string),
        });
        Ok(id)
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Move the id counters past any counter-style ids already present,
    /// so nodes added after a load never collide with loaded ones.
    pub(crate) fn resync_id_counters(&mut self) {
        for id in self.nodes.keys() {
            if let Some(index) = id.as_str().strip_prefix("node_").and_then(|s| s.parse().ok()) {
                self.ids.reserve_node(index);
            }
        }
        for edge in &self.edges {
            if let Some(index) = edge.id.0.strip_prefix("edge_").and_then(|s| s.parse().ok()) {
                self.ids.reserve_edge(index);
            }
        }
    }

    /// All edges in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Remove an edge by id.
    pub fn disconnect(&mut self, id: &EdgeId) -> GraphResult<Edge> {
        let pos = self
            .edges
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        Ok(self.edges.remove(pos))
    }

    // ========================================================================
    // Graph Analysis
    // ========================================================================

    /// Check whether the graph contains a cycle (Kahn count check).
    ///
    /// Cycles are never rejected by the editing layer; the client logs a
    /// warning and lets the processing service report them.
    pub fn has_cycle(&self) -> bool {
        let mut in_degree: HashMap<&NodeId, usize> =
            self.nodes.keys().map(|id| (id, 0)).collect();
        let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> =
            self.nodes.keys().map(|id| (id, Vec::new())).collect();

        for edge in &self.edges {
            // dangling edges cannot form a cycle
            if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
                continue;
            }
            if let Some(neighbors) = adjacency.get_mut(&edge.source) {
                neighbors.push(&edge.target);
            }
            in_degree.entry(&edge.target).and_modify(|d| *d += 1);
        }

        let mut queue: VecDeque<&NodeId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut visited = 0usize;
        while let Some(current) = queue.pop_front() {
            visited += 1;
            if let Some(neighbors) = adjacency.get(current) {
                for &next in neighbors {
                    if let Some(degree) = in_degree.get_mut(next) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        visited != self.nodes.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node and edge and reset the id counters.
    ///
    /// Irreversible: the core keeps no undo history.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.ids.reset();
    }
}

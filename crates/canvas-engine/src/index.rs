//! Derived adjacency index over a node/edge snapshot
//!
//! Built on demand from slices and dropped afterwards; the slices stay the
//! source of truth.

use std::collections::HashMap;

use crate::types::{CanvasEdge, CanvasNode};

/// Lookup tables for one graph snapshot
#[derive(Debug)]
pub struct GraphIndex<'a> {
    nodes_by_id: HashMap<&'a str, usize>,
    incoming: HashMap<&'a str, Vec<&'a CanvasEdge>>,
    outgoing: HashMap<&'a str, Vec<&'a CanvasEdge>>,
}

impl<'a> GraphIndex<'a> {
    pub fn build(nodes: &'a [CanvasNode], edges: &'a [CanvasEdge]) -> Self {
        let nodes_by_id = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let mut incoming: HashMap<&str, Vec<&CanvasEdge>> = HashMap::new();
        let mut outgoing: HashMap<&str, Vec<&CanvasEdge>> = HashMap::new();
        for edge in edges {
            incoming.entry(edge.target.as_str()).or_default().push(edge);
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
        }

        Self {
            nodes_by_id,
            incoming,
            outgoing,
        }
    }

    /// Position of a node in the node slice
    pub fn position_of(&self, node_id: &str) -> Option<usize> {
        self.nodes_by_id.get(node_id).copied()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes_by_id.contains_key(node_id)
    }

    /// Edges targeting a node, in edge order
    pub fn edges_by_target(&self, node_id: &str) -> &[&'a CanvasEdge] {
        self.incoming.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges leaving a node, in edge order
    pub fn edges_by_source(&self, node_id: &str) -> &[&'a CanvasEdge] {
        self.outgoing.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

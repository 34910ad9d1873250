//! The mutable canvas graph
//!
//! [`CanvasGraph`] owns the node and edge lists and is the only type that
//! changes them. Every mutation keeps the structural invariants: unique node
//! and edge ids, edges only between existing nodes and declared ports, no
//! duplicate tuples, no cycles.

use std::collections::HashSet;

use crate::error::{CanvasError, Result};
use crate::payload::NodeData;
use crate::types::{CanvasEdge, CanvasNode, Connection, EdgeId, Position};
use crate::validation::{self, ConnectionError};

/// Outcome of a connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The edge was committed
    Connected {
        edge_id: EdgeId,
        warning: Option<String>,
        hint: Option<String>,
    },
    /// The edge was refused and the graph is unchanged
    Rejected {
        error: ConnectionError,
        hint: Option<String>,
    },
}

impl ConnectOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectOutcome::Connected { .. })
    }

    /// Id of the committed edge, if any
    pub fn edge_id(&self) -> Option<&str> {
        match self {
            ConnectOutcome::Connected { edge_id, .. } => Some(edge_id),
            ConnectOutcome::Rejected { .. } => None,
        }
    }
}

/// Counts of everything dropped or rewritten while repairing a loaded graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Nodes whose `type` is not a known kind
    pub unknown_kinds: usize,
    /// Nodes whose payload could not be decoded for their kind
    pub bad_payloads: usize,
    /// Later nodes reusing an earlier node's id
    pub duplicate_nodes: usize,
    /// Edges referencing a missing node
    pub dangling_edges: usize,
    /// Edges repeating an earlier edge's endpoints
    pub duplicate_edges: usize,
    /// Edges with undeclared handles or incompatible types
    pub invalid_edges: usize,
    /// Edges that would close a cycle
    pub cyclic_edges: usize,
    /// Edges kept under a regenerated id
    pub regenerated_ids: usize,
}

impl RepairReport {
    /// Whether the input needed no repair at all
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }

    /// Add another report's counts to this one
    pub fn merge(&mut self, other: &RepairReport) {
        self.unknown_kinds += other.unknown_kinds;
        self.bad_payloads += other.bad_payloads;
        self.duplicate_nodes += other.duplicate_nodes;
        self.dangling_edges += other.dangling_edges;
        self.duplicate_edges += other.duplicate_edges;
        self.invalid_edges += other.invalid_edges;
        self.cyclic_edges += other.cyclic_edges;
        self.regenerated_ids += other.regenerated_ids;
    }

    /// Total number of dropped nodes and edges
    pub fn dropped(&self) -> usize {
        self.unknown_kinds
            + self.bad_payloads
            + self.duplicate_nodes
            + self.dangling_edges
            + self.duplicate_edges
            + self.invalid_edges
            + self.cyclic_edges
    }
}

/// Nodes and edges of one canvas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasGraph {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
}

impl CanvasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from untrusted parts, dropping whatever breaks an invariant
    ///
    /// Nodes keep their first occurrence. Edges are admitted in order, so an
    /// edge that would close a cycle loses to the edges before it.
    pub fn from_parts_repaired(nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> (Self, RepairReport) {
        let mut report = RepairReport::default();
        let mut graph = CanvasGraph::new();

        let mut seen: HashSet<String> = HashSet::new();
        for node in nodes {
            if seen.insert(node.id.clone()) {
                graph.nodes.push(node);
            } else {
                log::warn!("Dropping duplicate node '{}'", node.id);
                report.duplicate_nodes += 1;
            }
        }

        for edge in edges {
            let connection = edge.connection();
            let result = validation::check_connection(&connection, &graph.nodes, &graph.edges);

            match result.error {
                None => {}
                Some(ConnectionError::NodeNotFound) => {
                    log::warn!("Dropping edge '{}': references a missing node", edge.id);
                    report.dangling_edges += 1;
                    continue;
                }
                Some(ConnectionError::DuplicateConnection) => {
                    log::warn!("Dropping edge '{}': duplicate connection", edge.id);
                    report.duplicate_edges += 1;
                    continue;
                }
                Some(ConnectionError::SelfLoop) | Some(ConnectionError::WouldCreateCycle) => {
                    log::warn!("Dropping edge '{}': would create a cycle", edge.id);
                    report.cyclic_edges += 1;
                    continue;
                }
                Some(error) => {
                    log::warn!("Dropping edge '{}': {}", edge.id, error);
                    report.invalid_edges += 1;
                    continue;
                }
            }

            let id = graph.unique_edge_id(Some(&edge.id), &connection);
            if id != edge.id {
                log::warn!("Edge id '{}' already in use, renamed to '{}'", edge.id, id);
                report.regenerated_ids += 1;
            }
            graph.edges.push(CanvasEdge::from_connection(id, connection));
        }

        (graph, report)
    }

    /// Install a trusted state, such as a history snapshot
    pub fn replace(&mut self, nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) {
        self.nodes = nodes;
        self.edges = edges;
    }

    /// Install recomputed nodes with the same ids, e.g. a propagation result
    pub fn replace_nodes(&mut self, nodes: Vec<CanvasNode>) {
        debug_assert_eq!(nodes.len(), self.nodes.len());
        self.nodes = nodes;
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&CanvasEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Add a node with a unique id
    pub fn add_node(&mut self, node: CanvasNode) -> Result<()> {
        if self.contains_node(&node.id) {
            return Err(CanvasError::DuplicateNode(node.id));
        }
        log::debug!("Added {} node '{}'", node.kind(), node.id);
        self.nodes.push(node);
        Ok(())
    }

    /// Add nodes and the edges between them as one unit
    ///
    /// Either everything is committed or the graph is left unchanged.
    /// Returns the committed edge ids, which differ from the given ones only
    /// on collision.
    pub fn add_subgraph(&mut self, nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> Result<Vec<EdgeId>> {
        let mut staged = self.clone();

        for node in nodes {
            staged.add_node(node)?;
        }

        let mut ids = Vec::with_capacity(edges.len());
        for edge in edges {
            let requested = edge.id.clone();
            match staged.connect_with_id(&requested, edge.connection()) {
                ConnectOutcome::Connected { edge_id, .. } => ids.push(edge_id),
                ConnectOutcome::Rejected { error, .. } => {
                    return Err(CanvasError::InvalidConnection {
                        edge_id: requested,
                        reason: error.to_string(),
                    });
                }
            }
        }

        *self = staged;
        Ok(ids)
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &str) -> Result<(CanvasNode, Vec<CanvasEdge>)> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| CanvasError::node_not_found(id))?;
        let node = self.nodes.remove(index);

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.edges).into_iter().partition(|e| e.touches(id));
        self.edges = kept;

        log::debug!("Removed node '{}' and {} edge(s)", id, removed.len());
        Ok((node, removed))
    }

    /// Validate and commit a connection under a generated id
    pub fn connect(&mut self, connection: Connection) -> ConnectOutcome {
        self.connect_with_id("", connection)
    }

    /// Validate and commit a connection, preferring the given edge id
    ///
    /// An empty or colliding id is replaced by one derived from the
    /// connection's endpoints.
    pub fn connect_with_id(&mut self, edge_id: &str, connection: Connection) -> ConnectOutcome {
        let result = validation::check_connection(&connection, &self.nodes, &self.edges);
        if let Some(error) = result.error {
            log::warn!(
                "Rejected connection {}.{} -> {}.{}: {}",
                connection.source,
                connection.source_handle,
                connection.target,
                connection.target_handle,
                error
            );
            return ConnectOutcome::Rejected {
                error,
                hint: result.hint,
            };
        }

        let id = self.unique_edge_id(Some(edge_id), &connection);
        log::debug!(
            "Connected {}.{} -> {}.{} as '{}'",
            connection.source,
            connection.source_handle,
            connection.target,
            connection.target_handle,
            id
        );
        self.edges.push(CanvasEdge::from_connection(id.clone(), connection));

        ConnectOutcome::Connected {
            edge_id: id,
            warning: result.warning,
            hint: result.hint,
        }
    }

    /// Remove an edge by id
    pub fn disconnect(&mut self, edge_id: &str) -> Option<CanvasEdge> {
        let index = self.edges.iter().position(|e| e.id == edge_id)?;
        log::debug!("Disconnected '{}'", edge_id);
        Some(self.edges.remove(index))
    }

    /// Replace a node's payload; returns whether it differed
    ///
    /// The payload must be of the node's kind.
    pub fn update_node_data(&mut self, id: &str, data: NodeData) -> Result<bool> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CanvasError::node_not_found(id))?;

        if data.kind() != node.kind() {
            return Err(CanvasError::KindMismatch {
                node_id: id.to_string(),
                expected: node.kind(),
                found: data.kind(),
            });
        }

        if node.data == data {
            return Ok(false);
        }
        node.data = data;
        Ok(true)
    }

    /// Move a node; returns whether the position differed
    pub fn move_node(&mut self, id: &str, position: Position) -> Result<bool> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CanvasError::node_not_found(id))?;

        if node.position == position {
            return Ok(false);
        }
        node.position = position;
        Ok(true)
    }

    /// Set many positions at once, e.g. from auto-layout
    pub(crate) fn set_positions(&mut self, positions: &[(String, Position)]) {
        for (id, position) in positions {
            if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
                node.position = *position;
            }
        }
    }

    fn edge_id_taken(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    /// `preferred` if usable, else `edge-{s}-{sh}-{t}-{th}` with a numeric suffix on collision
    fn unique_edge_id(&self, preferred: Option<&str>, connection: &Connection) -> EdgeId {
        if let Some(id) = preferred.filter(|id| !id.is_empty() && !self.edge_id_taken(id)) {
            return id.to_string();
        }

        let base = format!(
            "edge-{}-{}-{}-{}",
            connection.source, connection.source_handle, connection.target, connection.target_handle
        );
        if !self.edge_id_taken(&base) {
            return base;
        }

        let mut n = 1;
        loop {
            let id = format!("{}-{}", base, n);
            if !self.edge_id_taken(&id) {
                return id;
            }
            n += 1;
        }
    }
}

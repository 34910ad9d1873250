//! Connection validation for canvas graphs
//!
//! Decides whether a prospective edge may be committed: endpoint presence,
//! self-loops, handle existence, port type compatibility, duplicates and
//! acyclicity. Failures are values carried in a [`ValidationResult`], never
//! panics or `Err`s, so the UI can show them next to the dragged wire.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::catalog;
use crate::types::{CanvasEdge, CanvasNode, Connection, EdgeId, NodeId, PortId, PortType};

/// Why a connection was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// One of the four endpoints is empty
    #[error("Connection is missing required parameters")]
    MissingEndpoint,
    /// Source and target are the same node
    #[error("Cannot connect a node to itself")]
    SelfLoop,
    /// Source or target node is not in the graph
    #[error("Source or target node not found")]
    NodeNotFound,
    /// The source kind declares no such output
    #[error("Source node does not have output '{0}'")]
    UnknownOutput(PortId),
    /// The target kind declares no such input
    #[error("Target node does not have input '{0}'")]
    UnknownInput(PortId),
    /// The output type cannot feed the input type
    #[error("Type mismatch: Cannot connect {output} to {input}")]
    TypeMismatch { output: PortType, input: PortType },
    /// An edge with the same four endpoints already exists
    #[error("These ports are already connected")]
    DuplicateConnection,
    /// The target already reaches the source
    #[error("Connection would create a cycle")]
    WouldCreateCycle,
}

/// Outcome of validating one connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Set when the connection must not be committed
    pub error: Option<ConnectionError>,
    /// Non-blocking caveat for an accepted connection
    pub warning: Option<String>,
    /// Advisory text for the user
    pub hint: Option<String>,
}

impl ValidationResult {
    fn accepted() -> Self {
        Self::default()
    }

    fn rejected(error: ConnectionError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Whether the connection may be committed
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Validation result of one existing edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeValidation {
    pub edge_id: EdgeId,
    pub result: ValidationResult,
}

/// An input that a given output could feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTarget {
    pub node_id: NodeId,
    pub input_id: &'static str,
    pub label: &'static str,
}

/// Validate a candidate connection against the node set
///
/// Checks run in a fixed order and the first failure wins: endpoints,
/// self-loop, node existence, output handle, input handle, type
/// compatibility. Accepted connections to a required input carry a hint.
pub fn validate_connection(candidate: &Connection, nodes: &[CanvasNode]) -> ValidationResult {
    if candidate.source.is_empty()
        || candidate.target.is_empty()
        || candidate.source_handle.is_empty()
        || candidate.target_handle.is_empty()
    {
        return ValidationResult::rejected(ConnectionError::MissingEndpoint);
    }

    if candidate.source == candidate.target {
        return ValidationResult::rejected(ConnectionError::SelfLoop);
    }

    let source = nodes.iter().find(|n| n.id == candidate.source);
    let target = nodes.iter().find(|n| n.id == candidate.target);
    let (Some(source), Some(target)) = (source, target) else {
        return ValidationResult::rejected(ConnectionError::NodeNotFound);
    };

    let Some(output) = catalog::definition(source.kind()).output_port(&candidate.source_handle)
    else {
        return ValidationResult::rejected(ConnectionError::UnknownOutput(
            candidate.source_handle.clone(),
        ));
    };

    let Some(input) = catalog::definition(target.kind()).input_port(&candidate.target_handle)
    else {
        return ValidationResult::rejected(ConnectionError::UnknownInput(
            candidate.target_handle.clone(),
        ));
    };

    if !output.port_type.is_compatible_with(&input.port_type) {
        return ValidationResult::rejected(ConnectionError::TypeMismatch {
            output: output.port_type,
            input: input.port_type,
        })
        .with_hint(format!(
            "Expected {}, got {}",
            input.port_type, output.port_type
        ));
    }

    if input.required {
        return ValidationResult::accepted()
            .with_hint(format!("Connecting to required input: {}", input.label));
    }

    ValidationResult::accepted()
}

/// Whether committing `candidate` would close a cycle
///
/// Breadth-first search from the candidate's target along existing edges;
/// the answer is true iff the candidate's source is reachable. A self-loop
/// is trivially a cycle.
pub fn would_create_cycle(candidate: &Connection, edges: &[CanvasEdge]) -> bool {
    if candidate.source == candidate.target {
        return true;
    }

    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        outgoing
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([candidate.target.as_str()]);

    while let Some(current) = queue.pop_front() {
        if current == candidate.source {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(next) = outgoing.get(current) {
            queue.extend(next.iter().filter(|id| !visited.contains(*id)));
        }
    }

    false
}

/// Full admission check for inserting `candidate` into the current graph
///
/// Runs [`validate_connection`], then rejects duplicate tuples and cycles.
/// A second edge into an already fed input is accepted with a warning.
pub fn check_connection(
    candidate: &Connection,
    nodes: &[CanvasNode],
    edges: &[CanvasEdge],
) -> ValidationResult {
    let mut result = validate_connection(candidate, nodes);
    if !result.is_valid() {
        return result;
    }

    if edges.iter().any(|e| e.links(candidate)) {
        return ValidationResult::rejected(ConnectionError::DuplicateConnection);
    }

    if would_create_cycle(candidate, edges) {
        return ValidationResult::rejected(ConnectionError::WouldCreateCycle)
            .with_hint("Data must flow in one direction; remove a connection first");
    }

    if edges
        .iter()
        .any(|e| e.target == candidate.target && e.target_handle == candidate.target_handle)
    {
        result.warning = Some(format!(
            "Input '{}' is already connected; the earlier connection takes precedence",
            candidate.target_handle
        ));
    }

    result
}

/// Validate every existing edge against the node set
pub fn validate_graph(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Vec<EdgeValidation> {
    edges
        .iter()
        .map(|edge| EdgeValidation {
            edge_id: edge.id.clone(),
            result: validate_connection(&edge.connection(), nodes),
        })
        .collect()
}

/// Every input on other nodes that the given output could feed
///
/// Only types are considered; duplicates and cycles are left to
/// [`check_connection`].
pub fn valid_targets(source: &str, source_handle: &str, nodes: &[CanvasNode]) -> Vec<ValidTarget> {
    let Some(source_node) = nodes.iter().find(|n| n.id == source) else {
        return Vec::new();
    };
    let Some(output) = catalog::definition(source_node.kind()).output_port(source_handle) else {
        return Vec::new();
    };

    nodes
        .iter()
        .filter(|node| node.id != source)
        .flat_map(|node| {
            catalog::definition(node.kind())
                .inputs
                .iter()
                .filter(|input| output.port_type.is_compatible_with(&input.port_type))
                .map(|input| ValidTarget {
                    node_id: node.id.clone(),
                    input_id: input.id,
                    label: input.label,
                })
        })
        .collect()
}

/// Short description of an output handle, e.g. `"Output: Image (image)"`
pub fn connection_hint(source: &str, source_handle: &str, nodes: &[CanvasNode]) -> Option<String> {
    let node = nodes.iter().find(|n| n.id == source)?;
    let output = catalog::definition(node.kind()).output_port(source_handle)?;
    Some(format!("Output: {} ({})", output.label, output.port_type))
}

/// Detect a cycle in the whole graph using Kahn's algorithm
///
/// Edges with an endpoint outside `nodes` are ignored.
pub fn detect_cycle(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> bool {
    let mut in_degree: HashMap<&str, usize> = nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    let known: Vec<&CanvasEdge> = edges
        .iter()
        .filter(|e| in_degree.contains_key(e.source.as_str()) && in_degree.contains_key(e.target.as_str()))
        .collect();

    for edge in &known {
        if let Some(deg) = in_degree.get_mut(edge.target.as_str()) {
            *deg += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0;
    while let Some(node_id) = queue.pop_front() {
        visited += 1;
        for edge in known.iter().filter(|e| e.source == node_id) {
            if let Some(deg) = in_degree.get_mut(edge.target.as_str()) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(&edge.target);
                }
            }
        }
    }

    visited < in_degree.len()
}

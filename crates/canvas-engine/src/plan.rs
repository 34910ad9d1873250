//! Execution planning for the generation subsystem
//!
//! Topological ordering, dependency lookup and "what can run now". The
//! engine never runs nodes itself; a host drives generation and reports
//! back through [`StatusTracker`].

use std::collections::{HashMap, VecDeque};

use crate::error::{CanvasError, Result};
use crate::status::{ExecutionStatus, StatusTracker};
use crate::types::{CanvasEdge, CanvasNode, NodeId};

/// Kahn's algorithm over node positions
///
/// Ties keep node order so the result is deterministic. Nodes left on a
/// cycle are appended in node order; the bool reports whether that happened.
pub(crate) fn topological_indices(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> (Vec<usize>, bool) {
    let positions: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        if let (Some(&s), Some(&t)) = (
            positions.get(edge.source.as_str()),
            positions.get(edge.target.as_str()),
        ) {
            successors[s].push(t);
            in_degree[t] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(i) = queue.pop_front() {
        order.push(i);
        for &t in &successors[i] {
            in_degree[t] -= 1;
            if in_degree[t] == 0 {
                queue.push_back(t);
            }
        }
    }

    let cyclic = order.len() < nodes.len();
    if cyclic {
        let mut seen = vec![false; nodes.len()];
        for &i in &order {
            seen[i] = true;
        }
        order.extend((0..nodes.len()).filter(|&i| !seen[i]));
    }

    (order, cyclic)
}

/// Node ids in an order where every node follows its dependencies
pub fn execution_order(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Result<Vec<NodeId>> {
    let (order, cyclic) = topological_indices(nodes, edges);
    if cyclic {
        return Err(CanvasError::CycleDetected);
    }
    Ok(order.into_iter().map(|i| nodes[i].id.clone()).collect())
}

/// Distinct direct upstream nodes of `node_id`, in edge order
pub fn dependencies(node_id: &str, edges: &[CanvasEdge]) -> Vec<NodeId> {
    let mut deps: Vec<NodeId> = Vec::new();
    for edge in edges.iter().filter(|e| e.target == node_id) {
        if !deps.contains(&edge.source) {
            deps.push(edge.source.clone());
        }
    }
    deps
}

/// Nodes from `order` that are idle and whose dependencies all completed
pub fn ready_nodes(order: &[NodeId], edges: &[CanvasEdge], tracker: &StatusTracker) -> Vec<NodeId> {
    order
        .iter()
        .filter(|id| tracker.status(id) == ExecutionStatus::Idle)
        .filter(|id| {
            dependencies(id, edges)
                .iter()
                .all(|dep| tracker.status(dep) == ExecutionStatus::Completed)
        })
        .cloned()
        .collect()
}

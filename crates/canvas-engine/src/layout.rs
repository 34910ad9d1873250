//! Automatic node placement
//!
//! Both functions return new positions keyed by node id and leave applying
//! them to the caller.

use std::collections::{HashMap, VecDeque};

use crate::config::LayoutConfig;
use crate::index::GraphIndex;
use crate::types::{CanvasEdge, CanvasNode, NodeId, Position};

/// Place nodes in rows by distance from the roots
///
/// Roots (no incoming edges) form level 0; each node sits one level below
/// the first parent that reached it in breadth-first order. Within a level
/// nodes keep the order in which they were reached. Nodes unreachable from
/// any root are appended to level 0.
pub fn hierarchical_layout(
    nodes: &[CanvasNode],
    edges: &[CanvasEdge],
    config: &LayoutConfig,
) -> Vec<(NodeId, Position)> {
    let index = GraphIndex::build(nodes, edges);
    let mut level_of: HashMap<&str, usize> = HashMap::new();
    let mut levels: Vec<Vec<&str>> = Vec::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

    for node in nodes {
        if index.edges_by_target(&node.id).is_empty() {
            level_of.insert(node.id.as_str(), 0);
            queue.push_back((node.id.as_str(), 0));
        }
    }

    while let Some((id, level)) = queue.pop_front() {
        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(id);

        for edge in index.edges_by_source(id) {
            if !level_of.contains_key(edge.target.as_str()) {
                level_of.insert(edge.target.as_str(), level + 1);
                queue.push_back((edge.target.as_str(), level + 1));
            }
        }
    }

    for node in nodes {
        if !level_of.contains_key(node.id.as_str()) {
            level_of.insert(node.id.as_str(), 0);
            if levels.is_empty() {
                levels.push(Vec::new());
            }
            levels[0].push(node.id.as_str());
        }
    }

    let slot: HashMap<&str, (usize, usize)> = levels
        .iter()
        .enumerate()
        .flat_map(|(level, ids)| ids.iter().enumerate().map(move |(i, id)| (*id, (level, i))))
        .collect();

    nodes
        .iter()
        .filter_map(|node| {
            let &(level, index) = slot.get(node.id.as_str())?;
            let position = Position::new(
                config.origin.x + index as f64 * config.spacing_x,
                config.origin.y + level as f64 * config.spacing_y,
            );
            Some((node.id.clone(), position))
        })
        .collect()
}

/// Shift every node so the bounding box is centered in a viewport
pub fn center_nodes(
    nodes: &[CanvasNode],
    viewport_width: f64,
    viewport_height: f64,
    config: &LayoutConfig,
) -> Vec<(NodeId, Position)> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let min_x = nodes.iter().map(|n| n.position.x).fold(f64::INFINITY, f64::min);
    let min_y = nodes.iter().map(|n| n.position.y).fold(f64::INFINITY, f64::min);
    let max_x = nodes
        .iter()
        .map(|n| n.position.x + config.node_width)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_y = nodes
        .iter()
        .map(|n| n.position.y + config.node_height)
        .fold(f64::NEG_INFINITY, f64::max);

    let offset_x = (viewport_width - (max_x - min_x)) / 2.0 - min_x;
    let offset_y = (viewport_height - (max_y - min_y)) / 2.0 - min_y;

    nodes
        .iter()
        .map(|n| {
            (
                n.id.clone(),
                Position::new(n.position.x + offset_x, n.position.y + offset_y),
            )
        })
        .collect()
}

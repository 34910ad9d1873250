//! Node factory
//!
//! Creates node instances with fresh ids, default payloads and positions
//! that do not overlap the existing canvas, and expands templates into
//! connected subgraphs.

use uuid::Uuid;

use crate::config::LayoutConfig;
use crate::error::{CanvasError, Result};
use crate::templates::{self, TemplateLayout};
use crate::types::{CanvasEdge, CanvasNode, Connection, NodeKind, Position};

/// Nodes and edges produced by expanding a template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInstance {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

/// Creates nodes according to a layout configuration
#[derive(Debug, Clone, Default)]
pub struct NodeFactory {
    layout: LayoutConfig,
}

impl NodeFactory {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Create a node of `kind` with its default payload
    ///
    /// Without a position hint the node is placed by
    /// [`default_position`](Self::default_position).
    pub fn create_node(
        &self,
        kind: NodeKind,
        hint: Option<Position>,
        existing: &[CanvasNode],
    ) -> CanvasNode {
        let position = hint.unwrap_or_else(|| self.default_position(existing));
        CanvasNode::with_defaults(new_node_id(kind), kind, position)
    }

    /// Next free slot: right of the rightmost node, or the origin
    ///
    /// Ties keep the first node in order.
    pub fn default_position(&self, existing: &[CanvasNode]) -> Position {
        let Some(first) = existing.first() else {
            return self.layout.origin;
        };

        let rightmost = existing.iter().fold(first, |best, node| {
            if node.position.x > best.position.x {
                node
            } else {
                best
            }
        });

        Position::new(rightmost.position.x + self.layout.spacing_x, rightmost.position.y)
    }

    /// Create a batch of nodes laid out in a row or a column from `start`
    pub fn create_nodes(
        &self,
        kinds: &[NodeKind],
        start: Position,
        layout: TemplateLayout,
    ) -> Vec<CanvasNode> {
        kinds
            .iter()
            .enumerate()
            .map(|(index, &kind)| {
                let offset = index as f64;
                let position = match layout {
                    TemplateLayout::Horizontal => {
                        Position::new(start.x + offset * self.layout.spacing_x, start.y)
                    }
                    TemplateLayout::Vertical => {
                        Position::new(start.x, start.y + offset * self.layout.spacing_y)
                    }
                };
                self.create_node(kind, Some(position), &[])
            })
            .collect()
    }

    /// Materialize a named template
    ///
    /// Every node gets a fresh id; edge ids are
    /// `edge-{template}-{index}-{batch}` with one batch id per call.
    pub fn create_nodes_from_template(
        &self,
        name: &str,
        hint: Option<Position>,
    ) -> Result<TemplateInstance> {
        let template =
            templates::template(name).ok_or_else(|| CanvasError::UnknownTemplate(name.to_string()))?;

        let start = hint.unwrap_or(self.layout.origin);
        let nodes = self.create_nodes(template.nodes, start, template.layout);
        let batch = Uuid::new_v4().simple().to_string();

        let edges = template
            .connections
            .iter()
            .enumerate()
            .map(|(index, link)| {
                let (from, from_handle) = link.from;
                let (to, to_handle) = link.to;
                let (Some(source), Some(target)) = (nodes.get(from), nodes.get(to)) else {
                    return Err(CanvasError::InvalidConnection {
                        edge_id: format!("edge-{}-{}", name, index),
                        reason: "node index out of range".to_string(),
                    });
                };
                Ok(CanvasEdge::from_connection(
                    format!("edge-{}-{}-{}", name, index, batch),
                    Connection::new(source.id.clone(), from_handle, target.id.clone(), to_handle),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Expanded template '{}' into {} node(s) and {} edge(s)",
            name,
            nodes.len(),
            edges.len()
        );

        Ok(TemplateInstance { nodes, edges })
    }
}

/// Fresh node id of the form `{kind}-{uuid}`
pub fn new_node_id(kind: NodeKind) -> String {
    format!("{}-{}", kind.as_str(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::NodeData;
    use crate::validation::check_connection;

    #[test]
    fn test_create_node_defaults() {
        let factory = NodeFactory::default();
        let node = factory.create_node(NodeKind::Variants, None, &[]);

        assert!(node.id.starts_with("variants-"));
        assert_eq!(node.position, Position::new(100.0, 100.0));
        assert_eq!(node.data, NodeData::default_for(NodeKind::Variants));
    }

    #[test]
    fn test_ids_are_unique() {
        let factory = NodeFactory::default();
        let a = factory.create_node(NodeKind::Text, None, &[]);
        let b = factory.create_node(NodeKind::Text, None, &[]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_default_position_right_of_rightmost() {
        let factory = NodeFactory::default();
        let existing = vec![
            CanvasNode::with_defaults("a", NodeKind::Text, Position::new(100.0, 100.0)),
            CanvasNode::with_defaults("b", NodeKind::Image, Position::new(500.0, 40.0)),
            CanvasNode::with_defaults("c", NodeKind::Output, Position::new(500.0, 900.0)),
        ];
        assert_eq!(factory.default_position(&existing), Position::new(900.0, 40.0));
    }

    #[test]
    fn test_hint_wins() {
        let factory = NodeFactory::default();
        let node = factory.create_node(NodeKind::Style, Some(Position::new(7.0, 8.0)), &[]);
        assert_eq!(node.position, Position::new(7.0, 8.0));
    }

    #[test]
    fn test_create_nodes_layouts() {
        let factory = NodeFactory::default();
        let start = Position::new(0.0, 0.0);

        let row = factory.create_nodes(&[NodeKind::Text, NodeKind::Image], start, TemplateLayout::Horizontal);
        assert_eq!(row[1].position, Position::new(400.0, 0.0));

        let column = factory.create_nodes(&[NodeKind::Text, NodeKind::Image], start, TemplateLayout::Vertical);
        assert_eq!(column[1].position, Position::new(0.0, 250.0));
    }

    #[test]
    fn test_unknown_template() {
        let factory = NodeFactory::default();
        assert!(matches!(
            factory.create_nodes_from_template("nope", None),
            Err(CanvasError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_every_template_passes_validation() {
        let factory = NodeFactory::default();

        for template in templates::all_templates() {
            let instance = factory
                .create_nodes_from_template(template.name, None)
                .unwrap();
            assert_eq!(instance.nodes.len(), template.nodes.len());

            let mut committed: Vec<CanvasEdge> = Vec::new();
            for edge in &instance.edges {
                assert!(edge.id.starts_with(&format!("edge-{}-", template.name)));
                let result = check_connection(&edge.connection(), &instance.nodes, &committed);
                assert!(
                    result.is_valid(),
                    "template '{}' edge {} rejected: {:?}",
                    template.name,
                    edge.id,
                    result.error
                );
                committed.push(edge.clone());
            }
        }
    }
}

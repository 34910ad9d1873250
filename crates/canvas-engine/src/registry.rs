//! Node type registry
//!
//! Query surface over the compiled-in catalog: lookups by kind or wire
//! name, palette grouping, port resolution and required-input checks.
//!
//! # Usage
//!
//! ```
//! use canvas_engine::{NodeKind, NodeRegistry};
//!
//! let registry = NodeRegistry::new();
//! let def = registry.definition_by_type("variants").unwrap();
//! assert_eq!(def.kind, NodeKind::Variants);
//! assert!(registry.output_port(NodeKind::Variants, "variant-2").is_some());
//! ```

use std::collections::HashMap;

use crate::catalog::{self, NodeCategory, NodeDefinition, PortDefinition};
use crate::types::{CanvasEdge, CanvasNode, NodeKind};

/// Registry of node kinds and their static definitions
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    entries: HashMap<&'static str, &'static NodeDefinition>,
}

impl NodeRegistry {
    /// Create a registry over the built-in catalog
    pub fn new() -> Self {
        let entries = NodeKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str(), catalog::definition(kind)))
            .collect();
        Self { entries }
    }

    /// Get the definition of a kind
    pub fn get_definition(&self, kind: NodeKind) -> &'static NodeDefinition {
        catalog::definition(kind)
    }

    /// Get the definition for a wire name such as `"prompt-builder"`
    pub fn definition_by_type(&self, node_type: &str) -> Option<&'static NodeDefinition> {
        self.entries.get(node_type).copied()
    }

    /// All definitions, in catalog order
    pub fn all_definitions(&self) -> Vec<&'static NodeDefinition> {
        NodeKind::ALL.into_iter().map(catalog::definition).collect()
    }

    /// Definitions grouped by category
    pub fn definitions_by_category(&self) -> HashMap<NodeCategory, Vec<&'static NodeDefinition>> {
        let mut grouped: HashMap<NodeCategory, Vec<&'static NodeDefinition>> = HashMap::new();
        for def in self.all_definitions() {
            grouped.entry(def.category).or_default().push(def);
        }
        grouped
    }

    /// Check if a wire name names a known kind
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// List all wire names, in catalog order
    pub fn node_types(&self) -> Vec<&'static str> {
        NodeKind::ALL.iter().map(|k| k.as_str()).collect()
    }

    /// Resolve an input handle of a kind
    pub fn input_port(&self, kind: NodeKind, handle: &str) -> Option<PortDefinition> {
        catalog::definition(kind).input_port(handle)
    }

    /// Resolve an output handle of a kind, including indexed handles
    pub fn output_port(&self, kind: NodeKind, handle: &str) -> Option<PortDefinition> {
        catalog::definition(kind).output_port(handle)
    }

    /// Required inputs of `node` that no edge feeds
    pub fn missing_required_inputs(
        &self,
        node: &CanvasNode,
        edges: &[CanvasEdge],
    ) -> Vec<PortDefinition> {
        catalog::definition(node.kind())
            .required_inputs()
            .filter(|port| {
                !edges
                    .iter()
                    .any(|e| e.target == node.id && e.target_handle == port.id)
            })
            .copied()
            .collect()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

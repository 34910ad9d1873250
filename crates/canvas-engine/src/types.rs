//! Core types for canvas graphs
//!
//! These types define the structure of a canvas: node kinds, port data
//! types, nodes, connections and edges. Node payloads live in
//! [`crate::payload`].

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CanvasError;
use crate::payload::NodeData;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Unique identifier for a port (a "handle")
pub type PortId = String;

/// Pairs beyond strict equality that an output may feed.
///
/// Always read as `(source output type, target input type)`; the relation is
/// not symmetric.
pub const COMPATIBILITY_TABLE: &[(PortType, PortType)] = &[(PortType::Image, PortType::Variants)];

/// The data type tag of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortType {
    /// Prompt or free text
    Text,
    /// Resolved image reference
    Image,
    /// Camera/lighting/atmosphere style settings
    Style,
    /// Material list
    Material,
    /// A set of generated variants
    Variants,
}

impl PortType {
    /// Every port type, in declaration order
    pub const ALL: [PortType; 5] = [
        PortType::Text,
        PortType::Image,
        PortType::Style,
        PortType::Material,
        PortType::Variants,
    ];

    /// Check whether an output of this type can feed an input of `target` type
    pub fn is_compatible_with(&self, target: &PortType) -> bool {
        if self == target {
            return true;
        }

        COMPATIBILITY_TABLE
            .iter()
            .any(|(source, accepted)| source == self && accepted == target)
    }

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            PortType::Text => "text",
            PortType::Image => "image",
            PortType::Style => "style",
            PortType::Material => "material",
            PortType::Variants => "variants",
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of node kinds the canvas knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Free text prompt
    Text,
    /// Image generator
    Image,
    /// Uploaded base image
    ImageInput,
    /// Style settings
    Style,
    /// Style extracted from a reference image
    StyleReference,
    /// Material settings
    Material,
    /// Variant generator
    Variants,
    /// Final output display
    Output,
    /// AI prompt builder
    PromptBuilder,
    /// Video generator
    Video,
}

impl NodeKind {
    /// Every node kind, in catalog order
    pub const ALL: [NodeKind; 10] = [
        NodeKind::Text,
        NodeKind::Image,
        NodeKind::ImageInput,
        NodeKind::Style,
        NodeKind::StyleReference,
        NodeKind::Material,
        NodeKind::Variants,
        NodeKind::Output,
        NodeKind::PromptBuilder,
        NodeKind::Video,
    ];

    /// Wire name of the kind (e.g. "image-input")
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Image => "image",
            NodeKind::ImageInput => "image-input",
            NodeKind::Style => "style",
            NodeKind::StyleReference => "style-reference",
            NodeKind::Material => "material",
            NodeKind::Variants => "variants",
            NodeKind::Output => "output",
            NodeKind::PromptBuilder => "prompt-builder",
            NodeKind::Video => "video",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CanvasError::UnknownNodeType(s.to_string()))
    }
}

/// Position of a node on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas viewport, carried by documents but ignored by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// A prospective edge: one output port feeding one input port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Source node ID
    pub source: NodeId,
    /// Source output port ID
    pub source_handle: PortId,
    /// Target node ID
    pub target: NodeId,
    /// Target input port ID
    pub target_handle: PortId,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }
}

/// A committed edge connecting two ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Source port ID
    pub source_handle: PortId,
    /// Target node ID
    pub target: NodeId,
    /// Target port ID
    pub target_handle: PortId,
}

impl CanvasEdge {
    /// Create an edge from a connection and an id
    pub fn from_connection(id: impl Into<String>, connection: Connection) -> Self {
        Self {
            id: id.into(),
            source: connection.source,
            source_handle: connection.source_handle,
            target: connection.target,
            target_handle: connection.target_handle,
        }
    }

    /// The connection this edge realizes
    pub fn connection(&self) -> Connection {
        Connection::new(
            self.source.clone(),
            self.source_handle.clone(),
            self.target.clone(),
            self.target_handle.clone(),
        )
    }

    /// Whether this edge links the same four endpoints as `connection`
    pub fn links(&self, connection: &Connection) -> bool {
        self.source == connection.source
            && self.source_handle == connection.source_handle
            && self.target == connection.target
            && self.target_handle == connection.target_handle
    }

    /// Whether this edge touches the given node on either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A node instance on the canvas
///
/// The node's kind is the variant of its payload, so the two can never
/// disagree. On the wire a node is `{ id, type, position, data }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct CanvasNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Position on the canvas
    pub position: Position,
    /// Kind-specific payload
    pub data: NodeData,
}

impl CanvasNode {
    /// Create a node with the given payload
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    /// Create a node of `kind` with that kind's default payload
    pub fn with_defaults(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self::new(id, position, NodeData::default_for(kind))
    }

    /// The kind of this node
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

impl Serialize for CanvasNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CanvasNode", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

/// Wire shape of a node before its payload is decoded against its kind
#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<RawNode> for CanvasNode {
    type Error = serde_json::Error;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let data = NodeData::from_value(raw.kind, raw.data)?;
        Ok(CanvasNode::new(raw.id, raw.position, data))
    }
}

//! Persisted canvas documents
//!
//! ```json
//! {
//!   "nodes": [{ "id": "...", "type": "image", "position": { "x": 0, "y": 0 }, "data": {} }],
//!   "connections": [{ "id": "...", "source": "...", "sourceHandle": "...", "target": "...", "targetHandle": "..." }],
//!   "viewport": { "x": 0, "y": 0, "zoom": 1 },
//!   "version": "1.0"
//! }
//! ```
//!
//! Loading never fails on structural problems. Unknown node types,
//! undecodable payloads, duplicate ids and connections that break a graph
//! invariant are dropped with a warning and counted in a [`RepairReport`].
//! Only malformed JSON is an error.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{CanvasGraph, RepairReport};
use crate::types::{CanvasEdge, CanvasNode, Connection, NodeKind, Viewport};

/// Version stamped on exported documents
pub const DOCUMENT_VERSION: &str = "1.0";

/// A canvas as stored or exchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    pub nodes: Vec<CanvasNode>,
    pub connections: Vec<CanvasEdge>,
    pub viewport: Viewport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Document shape accepted on load; every part is optional
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    nodes: Vec<serde_json::Value>,
    connections: Vec<serde_json::Value>,
    viewport: Viewport,
    version: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

/// Connection shape accepted on load; missing handles read as empty
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawConnection {
    id: String,
    source: String,
    source_handle: Option<String>,
    target: String,
    target_handle: Option<String>,
}

impl CanvasDocument {
    /// Snapshot a graph into a document
    pub fn from_graph(graph: &CanvasGraph, viewport: Viewport) -> Self {
        Self {
            nodes: graph.nodes().to_vec(),
            connections: graph.edges().to_vec(),
            viewport,
            ..Self::default()
        }
    }

    /// Parse and repair a document
    pub fn from_json_str(json: &str) -> Result<(Self, RepairReport)> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Repair a document from an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<(Self, RepairReport)> {
        let raw: RawDocument = serde_json::from_value(value)?;
        let mut report = RepairReport::default();

        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for value in raw.nodes {
            let kind_name = value.get("type").and_then(|t| t.as_str()).unwrap_or_default();
            let kind = match NodeKind::from_str(kind_name) {
                Ok(kind) => kind,
                Err(_) => {
                    log::warn!("Dropping node of unknown type '{}'", kind_name);
                    report.unknown_kinds += 1;
                    continue;
                }
            };

            match serde_json::from_value::<CanvasNode>(value) {
                Ok(node) => nodes.push(node),
                Err(e) => {
                    log::warn!("Dropping {} node with undecodable payload: {}", kind, e);
                    report.bad_payloads += 1;
                }
            }
        }

        let mut edges = Vec::with_capacity(raw.connections.len());
        for value in raw.connections {
            match serde_json::from_value::<RawConnection>(value) {
                Ok(c) => edges.push(CanvasEdge::from_connection(
                    c.id,
                    Connection::new(
                        c.source,
                        c.source_handle.unwrap_or_default(),
                        c.target,
                        c.target_handle.unwrap_or_default(),
                    ),
                )),
                Err(e) => {
                    log::warn!("Dropping malformed connection: {}", e);
                    report.invalid_edges += 1;
                }
            }
        }

        let (graph, graph_report) = CanvasGraph::from_parts_repaired(nodes, edges);
        report.merge(&graph_report);

        if !report.is_clean() {
            log::warn!("Repaired document on load: {:?}", report);
        }

        let document = Self {
            version: raw.version,
            name: raw.name,
            description: raw.description,
            ..Self::from_graph(&graph, raw.viewport)
        };
        Ok((document, report))
    }

    /// Pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy of this document stamped for export
    pub fn export(&self, name: Option<&str>, description: Option<&str>) -> Self {
        Self {
            version: Some(DOCUMENT_VERSION.to_string()),
            name: name.map(str::to_string).or_else(|| self.name.clone()),
            description: description.map(str::to_string).or_else(|| self.description.clone()),
            ..self.clone()
        }
    }

    /// Read and repair a document file
    pub fn read_from(path: impl AsRef<Path>) -> Result<(Self, RepairReport)> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Reading canvas document from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Write the document as pretty-printed JSON
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        log::debug!("Wrote canvas document to {}", path.display());
        Ok(())
    }

    /// Build the graph this document describes
    ///
    /// Documents produced by this module are already repaired; hand-built
    /// ones are repaired here.
    pub fn to_graph(&self) -> (CanvasGraph, RepairReport) {
        CanvasGraph::from_parts_repaired(self.nodes.clone(), self.connections.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::NodeData;

    const SAMPLE: &str = r#"{
        "nodes": [
            { "id": "n1", "type": "text", "position": { "x": 100, "y": 100 }, "data": { "prompt": "a red chair" } },
            { "id": "n2", "type": "image", "position": { "x": 500, "y": 100 }, "data": { "prompt": "", "status": "idle" } },
            { "id": "n3", "type": "sketch", "position": { "x": 0, "y": 0 }, "data": {} },
            { "id": "n4", "type": "variants", "position": { "x": 0, "y": 0 }, "data": { "count": "many" } }
        ],
        "connections": [
            { "id": "e1", "source": "n1", "sourceHandle": "text", "target": "n2", "targetHandle": "prompt" },
            { "id": "e2", "source": "n2", "sourceHandle": "image", "target": "gone", "targetHandle": "image" },
            { "id": "e3", "source": "n1", "target": "n2" }
        ],
        "viewport": { "x": 10, "y": 20, "zoom": 0.5 }
    }"#;

    #[test]
    fn test_load_repairs_document() {
        let (doc, report) = CanvasDocument::from_json_str(SAMPLE).unwrap();

        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.connections.len(), 1);
        assert_eq!(doc.connections[0].id, "e1");
        assert_eq!(doc.viewport.zoom, 0.5);

        assert_eq!(report.unknown_kinds, 1);
        assert_eq!(report.bad_payloads, 1);
        assert_eq!(report.dangling_edges, 1);
        assert_eq!(report.invalid_edges, 1);
        assert_eq!(report.dropped(), 4);

        match &doc.nodes[0].data {
            NodeData::Text(d) => assert_eq!(d.text, "a red chair"),
            other => panic!("Expected text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_sections_default() {
        let (doc, report) = CanvasDocument::from_json_str("{}").unwrap();
        assert!(doc.nodes.is_empty());
        assert_eq!(doc.viewport, Viewport::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(CanvasDocument::from_json_str("{ nodes: ").is_err());
    }

    #[test]
    fn test_export_stamps_version() {
        let (doc, _) = CanvasDocument::from_json_str(SAMPLE).unwrap();
        let exported = doc.export(Some("Chairs"), None);

        assert_eq!(exported.version.as_deref(), Some(DOCUMENT_VERSION));
        assert_eq!(exported.name.as_deref(), Some("Chairs"));
        assert!(exported.description.is_none());

        let json: serde_json::Value =
            serde_json::from_str(&exported.to_json_string().unwrap()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["connections"][0]["sourceHandle"], "text");
        assert_eq!(json["nodes"][1]["type"], "image");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.json");

        let (doc, _) = CanvasDocument::from_json_str(SAMPLE).unwrap();
        doc.write_to(&path).unwrap();

        let (back, report) = CanvasDocument::read_from(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(back, doc);
    }
}

//! Canvas Engine - Typed dataflow graph behind the generation canvas
//!
//! This crate models the node canvas of an image and video generation
//! workspace. It provides:
//!
//! - A static catalog of node kinds with typed input and output ports
//! - Connection validation with type compatibility and cycle prevention
//! - Propagation of upstream values into derived payload fields
//! - Compressed snapshot-based undo/redo
//! - Per-node execution status fed by an external generation subsystem
//! - Document loading with repair of broken graphs
//!
//! # Architecture
//!
//! - `CanvasGraph`: the only owner and mutator of nodes and edges
//! - `CanvasEditor`: runs each mutation through propagation, events and history
//! - `EventSink`: change notification, not tied to any UI host
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! use canvas_engine::payload::TextData;
//! use canvas_engine::{CanvasEditor, Connection, EngineConfig, NodeData, NodeKind, NullEventSink};
//!
//! let mut editor = CanvasEditor::new(&EngineConfig::default(), Arc::new(NullEventSink)).unwrap();
//! let text = editor.add_node(NodeKind::Text, None).unwrap();
//! let image = editor.add_node(NodeKind::Image, None).unwrap();
//! editor
//!     .connect(Connection::new(text.as_str(), "text", image.as_str(), "prompt"))
//!     .unwrap();
//!
//! let data = NodeData::Text(TextData {
//!     text: "a red chair".to_string(),
//!     ..TextData::default()
//! });
//! editor.update_node_data(&text, data, Instant::now()).unwrap();
//! ```

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod factory;
pub mod graph;
pub mod history;
pub mod index;
pub mod layout;
pub mod payload;
pub mod plan;
pub mod propagation;
pub mod registry;
pub mod status;
pub mod templates;
pub mod types;
pub mod validation;

// Re-export key types
pub use config::EngineConfig;
pub use document::CanvasDocument;
pub use editor::CanvasEditor;
pub use error::{CanvasError, Result};
pub use events::{CallbackEventSink, CanvasEvent, EventSink, NullEventSink, VecEventSink};
pub use factory::NodeFactory;
pub use graph::{CanvasGraph, ConnectOutcome, RepairReport};
pub use history::HistoryManager;
pub use payload::NodeData;
pub use propagation::propagate;
pub use registry::NodeRegistry;
pub use status::{ExecutionStatus, StatusTracker};
pub use types::{CanvasEdge, CanvasNode, Connection, NodeKind, PortType, Position, Viewport};
pub use validation::{ConnectionError, ValidationResult};

//! Canvas editor pipeline
//!
//! [`CanvasEditor`] is the single writer of a canvas. Every mutation goes
//! through the same steps:
//!
//! 1. install the change in the [`CanvasGraph`]
//! 2. run [`propagate`] on the committed state and install the result
//! 3. emit one [`CanvasEvent::NodeDataChanged`] per changed node
//! 4. record history, immediately for structural edits or after the
//!    debounce period for payload edits and moves
//!
//! The editor never reads a clock. Debounced edits take the current
//! [`Instant`] and the host calls [`CanvasEditor::tick`] to flush them.

use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::document::CanvasDocument;
use crate::error::Result;
use crate::events::{CanvasEvent, EventSink};
use crate::factory::NodeFactory;
use crate::graph::{CanvasGraph, ConnectOutcome, RepairReport};
use crate::history::{HistoryManager, Snapshot};
use crate::layout;
use crate::payload::NodeData;
use crate::plan;
use crate::propagation::propagate;
use crate::status::{ExecutionStatus, StatusTracker};
use crate::types::{CanvasEdge, CanvasNode, Connection, NodeId, NodeKind, Position, Viewport};
use crate::validation::{self, ValidTarget, ValidationResult};

/// Owns one canvas and keeps graph, history, statuses and listeners in step
pub struct CanvasEditor {
    graph: CanvasGraph,
    viewport: Viewport,
    history: HistoryManager,
    statuses: StatusTracker,
    factory: NodeFactory,
    pending_record: Debouncer,
    event_sink: Arc<dyn EventSink>,
}

impl CanvasEditor {
    /// Create an editor over an empty canvas
    pub fn new(config: &EngineConfig, event_sink: Arc<dyn EventSink>) -> Result<Self> {
        let graph = CanvasGraph::new();
        let mut history = HistoryManager::from_config(&config.history);
        history.initialize(graph.nodes(), graph.edges())?;

        Ok(Self {
            graph,
            viewport: Viewport::default(),
            history,
            statuses: StatusTracker::new(),
            factory: NodeFactory::new(config.layout.clone()),
            pending_record: Debouncer::new(config.history.debounce()),
            event_sink,
        })
    }

    pub fn graph(&self) -> &CanvasGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        self.graph.edges()
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.graph.node(id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pan or zoom; not recorded in history
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn statuses(&self) -> &StatusTracker {
        &self.statuses
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Parse, repair and load a JSON document
    ///
    /// The report covers every repair, both while parsing and while
    /// rebuilding the graph.
    pub fn load_json(&mut self, json: &str) -> Result<RepairReport> {
        let (document, mut report) = CanvasDocument::from_json_str(json)?;
        report.merge(&self.load_document(document)?);
        Ok(report)
    }

    /// Replace the canvas with a document
    ///
    /// The document is repaired, derived fields are recomputed and the
    /// history restarts from the loaded state. Node statuses are seeded from
    /// the payloads' generation status.
    ///
    /// The returned report only covers repairs made here. Documents from
    /// [`CanvasDocument::from_json_str`] were already repaired while parsing
    /// and come back clean; use [`load_json`](Self::load_json) to get one
    /// report for both steps.
    pub fn load_document(&mut self, document: CanvasDocument) -> Result<RepairReport> {
        let (graph, report) = document.to_graph();
        self.graph = graph;
        self.viewport = document.viewport;

        self.statuses.clear();
        for node in self.graph.nodes() {
            if let Some(status) = node.data.generation_status() {
                self.statuses.set_status(node.id.clone(), status.into());
            }
        }

        self.pending_record.cancel();
        self.propagate_and_notify(&[]);
        self.history.initialize(self.graph.nodes(), self.graph.edges())?;
        self.notify_history();

        log::debug!(
            "Loaded document with {} node(s) and {} edge(s)",
            self.graph.nodes().len(),
            self.graph.edges().len()
        );
        Ok(report)
    }

    /// Current canvas as a document
    pub fn to_document(&self) -> CanvasDocument {
        CanvasDocument::from_graph(&self.graph, self.viewport)
    }

    // =========================================================================
    // Structural edits (recorded immediately)
    // =========================================================================

    /// Create a node of `kind`, placed at `position` or the next free slot
    pub fn add_node(&mut self, kind: NodeKind, position: Option<Position>) -> Result<NodeId> {
        let node = self.factory.create_node(kind, position, self.graph.nodes());
        let id = node.id.clone();
        self.insert_node(node)?;
        Ok(id)
    }

    /// Add a fully built node
    pub fn insert_node(&mut self, node: CanvasNode) -> Result<()> {
        self.graph.add_node(node)?;
        self.propagate_and_notify(&[]);
        self.record_now()?;
        Ok(())
    }

    /// Expand a template and add it as one undoable step
    ///
    /// Returns the ids of the created nodes in template order.
    pub fn add_template(&mut self, name: &str, position: Option<Position>) -> Result<Vec<NodeId>> {
        let start = position.or_else(|| {
            (!self.graph.nodes().is_empty()).then(|| self.factory.default_position(self.graph.nodes()))
        });
        let instance = self.factory.create_nodes_from_template(name, start)?;
        let ids: Vec<NodeId> = instance.nodes.iter().map(|n| n.id.clone()).collect();

        self.graph.add_subgraph(instance.nodes, instance.edges)?;
        self.propagate_and_notify(&[]);
        self.record_now()?;
        Ok(ids)
    }

    /// Remove a node, its edges and its status
    pub fn remove_node(&mut self, id: &str) -> Result<CanvasNode> {
        let (node, _) = self.graph.remove_node(id)?;
        self.statuses.remove(id);
        self.propagate_and_notify(&[]);
        self.record_now()?;
        Ok(node)
    }

    /// Validate and commit a connection
    ///
    /// A rejected connection leaves the canvas and its history untouched.
    pub fn connect(&mut self, connection: Connection) -> Result<ConnectOutcome> {
        let outcome = self.graph.connect(connection);
        if outcome.is_connected() {
            self.propagate_and_notify(&[]);
            self.record_now()?;
        }
        Ok(outcome)
    }

    /// Remove an edge
    ///
    /// Fields the edge derived on its target keep their last value.
    pub fn disconnect(&mut self, edge_id: &str) -> Result<Option<CanvasEdge>> {
        let removed = self.graph.disconnect(edge_id);
        if removed.is_some() {
            self.propagate_and_notify(&[]);
            self.record_now()?;
        }
        Ok(removed)
    }

    /// Arrange the canvas in levels from its roots
    pub fn auto_layout(&mut self) -> Result<()> {
        let positions = layout::hierarchical_layout(self.graph.nodes(), self.graph.edges(), self.factory.layout());
        self.graph.set_positions(&positions);
        self.record_now()?;
        Ok(())
    }

    /// Center the canvas in a viewport of the given size
    pub fn center(&mut self, viewport_width: f64, viewport_height: f64) -> Result<()> {
        let positions = layout::center_nodes(
            self.graph.nodes(),
            viewport_width,
            viewport_height,
            self.factory.layout(),
        );
        self.graph.set_positions(&positions);
        self.record_now()?;
        Ok(())
    }

    // =========================================================================
    // Payload edits and moves (recorded after the debounce period)
    // =========================================================================

    /// Replace a node's payload
    ///
    /// Returns whether the payload differed. Downstream nodes are updated
    /// right away; the history entry waits for the edits to go quiet.
    pub fn update_node_data(&mut self, id: &str, data: NodeData, now: Instant) -> Result<bool> {
        if !self.graph.update_node_data(id, data)? {
            return Ok(false);
        }
        self.propagate_and_notify(&[id.to_string()]);
        self.pending_record.schedule(now);
        Ok(true)
    }

    /// Move a node; returns whether the position differed
    pub fn move_node(&mut self, id: &str, position: Position, now: Instant) -> Result<bool> {
        if !self.graph.move_node(id, position)? {
            return Ok(false);
        }
        self.pending_record.schedule(now);
        Ok(true)
    }

    /// Record a debounced edit if its quiet period has passed
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        if self.pending_record.fire_if_due(now) {
            return self.push_history();
        }
        Ok(false)
    }

    /// Record a pending debounced edit right away
    pub fn flush_history(&mut self) -> Result<bool> {
        if self.pending_record.cancel() {
            return self.push_history();
        }
        Ok(false)
    }

    pub fn has_pending_history(&self) -> bool {
        self.pending_record.is_pending()
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.pending_record.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        !self.pending_record.is_pending() && self.history.can_redo()
    }

    /// Step back one history entry; returns false at the oldest entry
    pub fn undo(&mut self) -> Result<bool> {
        self.flush_history()?;
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot?);
                log::debug!("Undo: restored {} node(s)", self.graph.nodes().len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Step forward one history entry; returns false at the newest entry
    pub fn redo(&mut self) -> Result<bool> {
        self.flush_history()?;
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot?);
                log::debug!("Redo: restored {} node(s)", self.graph.nodes().len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // =========================================================================
    // Execution status
    // =========================================================================

    /// Record a node's status as reported by the generation subsystem
    pub fn set_status(&mut self, node_id: &str, status: ExecutionStatus) -> ExecutionStatus {
        if !self.graph.contains_node(node_id) {
            log::warn!("Status {:?} reported for unknown node '{}'", status, node_id);
        }
        let previous = self.statuses.set_status(node_id, status);
        self.emit(CanvasEvent::status_changed(node_id, status));
        previous
    }

    pub fn status(&self, node_id: &str) -> ExecutionStatus {
        self.statuses.status(node_id)
    }

    pub fn is_any_running(&self) -> bool {
        self.statuses.is_any_running()
    }

    /// Node ids in dependency order
    pub fn execution_order(&self) -> Result<Vec<NodeId>> {
        plan::execution_order(self.graph.nodes(), self.graph.edges())
    }

    /// Idle nodes whose dependencies have all completed
    pub fn ready_nodes(&self) -> Result<Vec<NodeId>> {
        let order = self.execution_order()?;
        Ok(plan::ready_nodes(&order, self.graph.edges(), &self.statuses))
    }

    // =========================================================================
    // Connection queries
    // =========================================================================

    /// Check a prospective connection without committing it
    pub fn check_connection(&self, connection: &Connection) -> ValidationResult {
        validation::check_connection(connection, self.graph.nodes(), self.graph.edges())
    }

    /// Inputs an output port could be connected to
    pub fn valid_targets(&self, source: &str, source_handle: &str) -> Vec<ValidTarget> {
        validation::valid_targets(source, source_handle, self.graph.nodes())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Run propagation and notify for `edited` plus every derived change
    fn propagate_and_notify(&mut self, edited: &[NodeId]) {
        let result = propagate(self.graph.nodes(), self.graph.edges());
        let mut changed: Vec<NodeId> = edited.to_vec();
        if !result.is_unchanged() {
            for id in &result.changed {
                if !changed.contains(id) {
                    changed.push(id.clone());
                }
            }
            let nodes = result.into_nodes();
            self.graph.replace_nodes(nodes);
        }

        for id in &changed {
            if let Some(node) = self.graph.node(id) {
                self.emit(CanvasEvent::node_data_changed(id, node.data.clone()));
            }
        }
    }

    /// Install a history snapshot and report what it changed
    ///
    /// Statuses of nodes absent from the snapshot are dropped.
    fn restore(&mut self, snapshot: Snapshot) {
        let before = std::mem::take(&mut self.graph);
        self.graph.replace(snapshot.nodes, snapshot.edges);
        self.statuses.retain(|id| self.graph.contains_node(id));

        for node in self.graph.nodes() {
            if before.node(&node.id).map(|n| &n.data) != Some(&node.data) {
                self.emit(CanvasEvent::node_data_changed(&node.id, node.data.clone()));
            }
        }
        self.notify_history();
    }

    fn record_now(&mut self) -> Result<()> {
        self.pending_record.cancel();
        self.push_history()?;
        Ok(())
    }

    fn push_history(&mut self) -> Result<bool> {
        let pushed = self.history.push_state(self.graph.nodes(), self.graph.edges())?;
        if pushed {
            self.notify_history();
        }
        Ok(pushed)
    }

    fn notify_history(&self) {
        self.emit(CanvasEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn emit(&self, event: CanvasEvent) {
        if let Err(e) = self.event_sink.send(event) {
            log::warn!("Failed to deliver canvas event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::events::{EventError, VecEventSink};
    use crate::payload::{PromptBuilderData, TextData};

    struct FailingSink;

    impl EventSink for FailingSink {
        fn send(&self, _event: CanvasEvent) -> std::result::Result<(), EventError> {
            Err(EventError {
                message: "listener gone".to_string(),
            })
        }
    }

    fn text_of(editor: &CanvasEditor, id: &str) -> String {
        match &editor.node(id).unwrap().data {
            NodeData::Text(d) => d.text.clone(),
            other => panic!("Expected text payload, got {:?}", other),
        }
    }

    fn editor() -> (CanvasEditor, Arc<VecEventSink>) {
        let sink = Arc::new(VecEventSink::new());
        let editor = CanvasEditor::new(&EngineConfig::default(), sink.clone()).unwrap();
        (editor, sink)
    }

    fn text(value: &str) -> NodeData {
        NodeData::Text(TextData {
            text: value.to_string(),
            ..TextData::default()
        })
    }

    fn image_prompt(editor: &CanvasEditor, id: &str) -> String {
        match &editor.node(id).unwrap().data {
            NodeData::Image(d) => d.prompt.clone(),
            other => panic!("Expected image payload, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_propagates_and_notifies() {
        let (mut editor, sink) = editor();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        let i = editor.add_node(NodeKind::Image, None).unwrap();
        assert!(editor
            .connect(Connection::new(t.as_str(), "text", i.as_str(), "prompt"))
            .unwrap()
            .is_connected());
        sink.clear();

        let now = Instant::now();
        assert!(editor.update_node_data(&t, text("a red chair"), now).unwrap());
        assert_eq!(image_prompt(&editor, &i), "a red chair");

        let changed: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                CanvasEvent::NodeDataChanged { node_id, .. } => Some(node_id),
                _ => None,
            })
            .collect();
        assert_eq!(changed, vec![t.clone(), i.clone()]);
    }

    #[test]
    fn test_rejected_connection_leaves_history() {
        let (mut editor, _) = editor();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        let len = editor.history().len();

        let outcome = editor
            .connect(Connection::new(t.as_str(), "text", t.as_str(), "text"))
            .unwrap();
        assert!(!outcome.is_connected());
        assert_eq!(editor.history().len(), len);
    }

    #[test]
    fn test_debounced_edits_coalesce() {
        let (mut editor, _) = editor();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        let len = editor.history().len();

        let start = Instant::now();
        editor.update_node_data(&t, text("a"), start).unwrap();
        editor
            .update_node_data(&t, text("ab"), start + Duration::from_millis(200))
            .unwrap();
        editor
            .update_node_data(&t, text("abc"), start + Duration::from_millis(400))
            .unwrap();

        assert!(!editor.tick(start + Duration::from_millis(600)).unwrap());
        assert!(editor.tick(start + Duration::from_millis(900)).unwrap());
        assert_eq!(editor.history().len(), len + 1);

        assert!(editor.undo().unwrap());
        match &editor.node(&t).unwrap().data {
            NodeData::Text(d) => assert_eq!(d.text, ""),
            other => panic!("Expected text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_undo_flushes_pending_edit() {
        let (mut editor, _) = editor();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        editor.update_node_data(&t, text("draft"), Instant::now()).unwrap();
        assert!(editor.has_pending_history());

        assert!(editor.undo().unwrap());
        assert!(!editor.has_pending_history());
        assert!(editor.redo().unwrap());
        match &editor.node(&t).unwrap().data {
            NodeData::Text(d) => assert_eq!(d.text, "draft"),
            other => panic!("Expected text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_undo_redo_structure() {
        let (mut editor, sink) = editor();
        assert!(!editor.can_undo());

        let t = editor.add_node(NodeKind::Text, None).unwrap();
        let i = editor.add_node(NodeKind::Image, None).unwrap();
        assert_eq!(editor.nodes().len(), 2);

        assert!(editor.undo().unwrap());
        assert_eq!(editor.nodes().len(), 1);
        assert!(editor.node(&i).is_none());
        assert!(editor.node(&t).is_some());

        assert!(editor.redo().unwrap());
        assert_eq!(editor.nodes().len(), 2);
        assert!(!editor.redo().unwrap());

        assert!(sink.events().iter().any(|e| matches!(
            e,
            CanvasEvent::HistoryChanged {
                can_undo: true,
                can_redo: true
            }
        )));
    }

    #[test]
    fn test_template_is_one_step() {
        let (mut editor, _) = editor();
        let ids = editor.add_template("basic", None).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(editor.edges().len(), 2);

        assert!(editor.undo().unwrap());
        assert!(editor.nodes().is_empty());
    }

    #[test]
    fn test_remove_node_drops_status() {
        let (mut editor, sink) = editor();
        let i = editor.add_node(NodeKind::Image, None).unwrap();

        editor.set_status(&i, ExecutionStatus::Running);
        assert!(editor.is_any_running());
        assert!(sink
            .events()
            .contains(&CanvasEvent::status_changed(&i, ExecutionStatus::Running)));

        editor.remove_node(&i).unwrap();
        assert!(!editor.is_any_running());
        assert_eq!(editor.status(&i), ExecutionStatus::Idle);
    }

    #[test]
    fn test_ready_nodes_follow_status() {
        let (mut editor, _) = editor();
        let ids = editor.add_template("basic", None).unwrap();

        assert_eq!(editor.ready_nodes().unwrap(), vec![ids[0].clone()]);
        editor.set_status(&ids[0], ExecutionStatus::Completed);
        assert_eq!(editor.ready_nodes().unwrap(), vec![ids[1].clone()]);
    }

    #[test]
    fn test_load_document_resets_history() {
        let (mut editor, _) = editor();
        editor.add_node(NodeKind::Text, None).unwrap();

        let json = r#"{
            "nodes": [
                { "id": "t", "type": "text", "position": { "x": 0, "y": 0 }, "data": { "text": "loaded" } },
                { "id": "i", "type": "image", "position": { "x": 400, "y": 0 }, "data": { "status": "generating" } }
            ],
            "connections": [
                { "id": "e1", "source": "t", "sourceHandle": "text", "target": "i", "targetHandle": "prompt" },
                { "id": "e2", "source": "t", "sourceHandle": "text", "target": "missing", "targetHandle": "prompt" }
            ]
        }"#;
        let (document, _) = CanvasDocument::from_json_str(json).unwrap();
        let report = editor.load_document(document).unwrap();

        assert!(report.is_clean());
        assert_eq!(editor.nodes().len(), 2);
        assert_eq!(editor.edges().len(), 1);
        assert_eq!(image_prompt(&editor, "i"), "loaded");
        assert_eq!(editor.status("i"), ExecutionStatus::Running);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_auto_layout_is_undoable() {
        let (mut editor, _) = editor();
        let ids = editor.add_template("basic", Some(Position::new(0.0, 0.0))).unwrap();
        let before = editor.node(&ids[2]).unwrap().position;

        editor.auto_layout().unwrap();
        assert_eq!(editor.node(&ids[2]).unwrap().position, Position::new(100.0, 600.0));

        editor.undo().unwrap();
        assert_eq!(editor.node(&ids[2]).unwrap().position, before);
    }

    #[test]
    fn test_undo_drops_status_of_vanished_node() {
        let (mut editor, _) = editor();
        let i = editor.add_node(NodeKind::Image, None).unwrap();
        editor.set_status(&i, ExecutionStatus::Running);

        assert!(editor.undo().unwrap());
        assert!(editor.node(&i).is_none());
        assert!(!editor.is_any_running());
        assert_eq!(editor.status(&i), ExecutionStatus::Idle);
    }

    #[test]
    fn test_undo_redo_notify_reverted_payloads() {
        let (mut editor, sink) = editor();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        editor.update_node_data(&t, text("x"), Instant::now()).unwrap();
        editor.flush_history().unwrap();
        sink.clear();

        assert!(editor.undo().unwrap());
        let data_events: Vec<CanvasEvent> = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, CanvasEvent::NodeDataChanged { .. }))
            .collect();
        assert_eq!(data_events.len(), 1);
        match &data_events[0] {
            CanvasEvent::NodeDataChanged {
                node_id,
                data: NodeData::Text(d),
            } => {
                assert_eq!(node_id, &t);
                assert_eq!(d.text, "");
            }
            other => panic!("Expected text change, got {:?}", other),
        }

        sink.clear();
        assert!(editor.redo().unwrap());
        assert!(sink.events().contains(&CanvasEvent::node_data_changed(&t, text("x"))));
    }

    #[test]
    fn test_text_edit_after_generated_prompt_is_kept() {
        let (mut editor, _) = editor();
        let pb = editor.add_node(NodeKind::PromptBuilder, None).unwrap();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        editor
            .connect(Connection::new(pb.as_str(), "prompt", t.as_str(), "text"))
            .unwrap();

        let generated = |prompt: &str| {
            NodeData::PromptBuilder(PromptBuilderData {
                generated_prompt: prompt.to_string(),
                ..PromptBuilderData::default()
            })
        };
        let now = Instant::now();

        editor.update_node_data(&pb, generated("gen"), now).unwrap();
        assert_eq!(text_of(&editor, &t), "gen");

        let edited = match &editor.node(&t).unwrap().data {
            NodeData::Text(d) => NodeData::Text(TextData {
                text: "user edit".to_string(),
                ..d.clone()
            }),
            other => panic!("Expected text payload, got {:?}", other),
        };
        assert!(editor.update_node_data(&t, edited, now).unwrap());
        assert_eq!(text_of(&editor, &t), "user edit");

        editor.update_node_data(&pb, generated("second"), now).unwrap();
        assert_eq!(text_of(&editor, &t), "second");
    }

    #[test]
    fn test_load_json_reports_parse_repairs() {
        let (mut editor, _) = editor();
        let json = r#"{
            "nodes": [
                { "id": "t", "type": "text", "position": { "x": 0, "y": 0 }, "data": {} },
                { "id": "s", "type": "sketch", "position": { "x": 0, "y": 0 }, "data": {} }
            ],
            "connections": [
                { "id": "e1", "source": "t", "sourceHandle": "text", "target": "missing", "targetHandle": "prompt" }
            ]
        }"#;

        let report = editor.load_json(json).unwrap();
        assert_eq!(report.unknown_kinds, 1);
        assert_eq!(report.dangling_edges, 1);
        assert_eq!(editor.nodes().len(), 1);
    }

    #[test]
    fn test_failing_sink_does_not_block_edits() {
        let mut editor = CanvasEditor::new(&EngineConfig::default(), Arc::new(FailingSink)).unwrap();
        let t = editor.add_node(NodeKind::Text, None).unwrap();
        assert!(editor.update_node_data(&t, text("still applied"), Instant::now()).unwrap());
        assert_eq!(text_of(&editor, &t), "still applied");
    }
}

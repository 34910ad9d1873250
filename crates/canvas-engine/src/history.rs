//! Undo/redo history using compressed snapshots
//!
//! Each entry is a full `(nodes, edges)` snapshot, JSON encoded and zstd
//! compressed. A cursor marks the current entry: everything before it is
//! undo history, everything after it is redo history.
//!
//! Coalescing rapid edits is the caller's job; see [`crate::debounce`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::HistoryConfig;
use crate::error::{CanvasError, Result};
use crate::types::{CanvasEdge, CanvasNode};

/// A restored graph state
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    nodes: &'a [CanvasNode],
    edges: &'a [CanvasEdge],
}

/// Bounded undo/redo history
#[derive(Debug)]
pub struct HistoryManager {
    /// Compressed graph states (zstd)
    snapshots: VecDeque<Vec<u8>>,
    /// Current position in the history
    current: usize,
    max_snapshots: usize,
    compression_level: i32,
}

impl HistoryManager {
    /// Create an empty history keeping at most `max_snapshots` entries
    pub fn new(max_snapshots: usize) -> Self {
        Self::from_config(&HistoryConfig {
            max_snapshots,
            ..HistoryConfig::default()
        })
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self {
            snapshots: VecDeque::new(),
            current: 0,
            // At least 1 snapshot
            max_snapshots: config.max_snapshots.max(1),
            compression_level: config.compression_level,
        }
    }

    /// Reset the history to a single snapshot of the given state
    pub fn initialize(&mut self, nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Result<()> {
        let compressed = self.compress(nodes, edges)?;
        self.snapshots.clear();
        self.snapshots.push_back(compressed);
        self.current = 0;
        log::trace!("History initialized with {} node(s)", nodes.len());
        Ok(())
    }

    /// Record a new state
    ///
    /// Truncates redo history and drops the oldest entries beyond the limit.
    /// Returns `false` without touching anything when the state equals the
    /// current snapshot.
    pub fn push_state(&mut self, nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Result<bool> {
        let compressed = self.compress(nodes, edges)?;

        if self.snapshots.get(self.current) == Some(&compressed) {
            log::trace!("History push skipped: state unchanged");
            return Ok(false);
        }

        // Truncate any redo history
        self.snapshots.truncate(self.current + 1);

        self.snapshots.push_back(compressed);
        self.current = self.snapshots.len() - 1;

        while self.snapshots.len() > self.max_snapshots {
            self.snapshots.pop_front();
            self.current = self.current.saturating_sub(1);
        }

        log::trace!(
            "History push: {} snapshot(s), cursor at {}",
            self.snapshots.len(),
            self.current
        );
        Ok(true)
    }

    /// Move back one snapshot
    ///
    /// Returns the previous state, or None at the oldest entry.
    pub fn undo(&mut self) -> Option<Result<Snapshot>> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        Some(self.decompress(self.current))
    }

    /// Move forward one snapshot
    ///
    /// Returns the next state, or None at the newest entry.
    pub fn redo(&mut self) -> Option<Result<Snapshot>> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        Some(self.decompress(self.current))
    }

    /// The state under the cursor
    pub fn current(&self) -> Option<Result<Snapshot>> {
        if self.snapshots.is_empty() {
            None
        } else {
            Some(self.decompress(self.current))
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current = 0;
    }

    /// Total compressed size of all snapshots in bytes
    pub fn compressed_size(&self) -> usize {
        self.snapshots.iter().map(|s| s.len()).sum()
    }

    fn compress(&self, nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(&SnapshotRef { nodes, edges })?;
        zstd::encode_all(&json[..], self.compression_level)
            .map_err(|e| CanvasError::Compression(e.to_string()))
    }

    fn decompress(&self, index: usize) -> Result<Snapshot> {
        let compressed = &self.snapshots[index];
        let json = zstd::decode_all(&compressed[..])
            .map_err(|e| CanvasError::Compression(e.to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{NodeData, TextData};
    use crate::types::Position;

    fn state(text: &str) -> Vec<CanvasNode> {
        vec![CanvasNode::new(
            "node1",
            Position::default(),
            NodeData::Text(TextData {
                text: text.to_string(),
                placeholder: None,
                synced_prompt: None,
            }),
        )]
    }

    fn text_of(snapshot: &Snapshot) -> &str {
        match &snapshot.nodes[0].data {
            NodeData::Text(d) => &d.text,
            other => panic!("Expected text payload, got {:?}", other),
        }
    }

    #[test]
    fn test_push_and_undo() {
        let mut history = HistoryManager::new(10);
        history.initialize(&state("first"), &[]).unwrap();
        history.push_state(&state("second"), &[]).unwrap();
        history.push_state(&state("third"), &[]).unwrap();

        let current = history.current().unwrap().unwrap();
        assert_eq!(text_of(&current), "third");

        let undone = history.undo().unwrap().unwrap();
        assert_eq!(text_of(&undone), "second");

        let undone = history.undo().unwrap().unwrap();
        assert_eq!(text_of(&undone), "first");

        assert!(history.undo().is_none());
    }

    #[test]
    fn test_redo() {
        let mut history = HistoryManager::new(10);
        history.initialize(&state("first"), &[]).unwrap();
        history.push_state(&state("second"), &[]).unwrap();

        history.undo();

        let redone = history.redo().unwrap().unwrap();
        assert_eq!(text_of(&redone), "second");
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_truncates_redo() {
        let mut history = HistoryManager::new(10);
        history.initialize(&state("first"), &[]).unwrap();
        history.push_state(&state("second"), &[]).unwrap();
        history.undo();

        history.push_state(&state("third"), &[]).unwrap();

        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        let current = history.current().unwrap().unwrap();
        assert_eq!(text_of(&current), "third");
    }

    #[test]
    fn test_identical_push_is_noop() {
        let mut history = HistoryManager::new(10);
        history.initialize(&state("same"), &[]).unwrap();

        assert!(!history.push_state(&state("same"), &[]).unwrap());
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_max_snapshots() {
        let mut history = HistoryManager::new(3);
        history.initialize(&state("graph_0"), &[]).unwrap();
        for i in 1..5 {
            history.push_state(&state(&format!("graph_{}", i)), &[]).unwrap();
        }

        assert_eq!(history.len(), 3);
        let current = history.current().unwrap().unwrap();
        assert_eq!(text_of(&current), "graph_4");

        history.undo();
        history.undo();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_initialize_clears_redo() {
        let mut history = HistoryManager::new(10);
        history.initialize(&state("a"), &[]).unwrap();
        history.push_state(&state("b"), &[]).unwrap();
        history.undo();
        assert!(history.can_redo());

        history.initialize(&state("loaded"), &[]).unwrap();
        assert!(!history.can_redo());
        assert!(!history.can_undo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_can_undo_redo() {
        let mut history = HistoryManager::default();

        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.current().is_none());

        history.push_state(&state("first"), &[]).unwrap();
        assert!(!history.can_undo());

        history.push_state(&state("second"), &[]).unwrap();
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert!(history.compressed_size() > 0);

        history.clear();
        assert!(history.is_empty());
    }
}

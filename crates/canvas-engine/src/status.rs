//! Per-node execution status
//!
//! The generation subsystem lives outside the engine and reports progress
//! here; the canvas reads it back to render spinners and to decide what is
//! ready to run next (see [`crate::plan::ready_nodes`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::payload::GenerationStatus;
use crate::types::NodeId;

/// Execution state of one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
    Skipped,
}

impl ExecutionStatus {
    /// Whether the node is done for this run, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::Error | ExecutionStatus::Skipped
        )
    }
}

impl From<GenerationStatus> for ExecutionStatus {
    fn from(status: GenerationStatus) -> Self {
        match status {
            GenerationStatus::Idle => ExecutionStatus::Idle,
            GenerationStatus::Generating => ExecutionStatus::Running,
            GenerationStatus::Completed => ExecutionStatus::Completed,
            GenerationStatus::Error => ExecutionStatus::Error,
        }
    }
}

/// Map of node id to its externally supplied status
///
/// Unknown ids read as [`ExecutionStatus::Idle`].
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    statuses: HashMap<NodeId, ExecutionStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a node's status, returning the previous one
    pub fn set_status(&mut self, node_id: impl Into<NodeId>, status: ExecutionStatus) -> ExecutionStatus {
        self.statuses
            .insert(node_id.into(), status)
            .unwrap_or_default()
    }

    pub fn status(&self, node_id: &str) -> ExecutionStatus {
        self.statuses.get(node_id).copied().unwrap_or_default()
    }

    pub fn is_any_running(&self) -> bool {
        self.statuses.values().any(|s| *s == ExecutionStatus::Running)
    }

    /// Ids of running nodes, sorted
    pub fn running_nodes(&self) -> Vec<&str> {
        let mut running: Vec<&str> = self
            .statuses
            .iter()
            .filter(|(_, s)| **s == ExecutionStatus::Running)
            .map(|(id, _)| id.as_str())
            .collect();
        running.sort_unstable();
        running
    }

    /// Forget a node's status
    pub fn remove(&mut self, node_id: &str) -> Option<ExecutionStatus> {
        self.statuses.remove(node_id)
    }

    pub fn clear(&mut self) {
        self.statuses.clear();
    }

    /// Keep only the statuses whose node id satisfies `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.statuses.retain(|id, _| keep(id));
    }
}

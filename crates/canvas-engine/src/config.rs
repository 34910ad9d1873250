//! Engine configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock behaviour.
//!
//! ```json
//! {
//!   "history": { "maxSnapshots": 50, "debounceMs": 250 },
//!   "layout": { "spacingX": 360 }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Position;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub history: HistoryConfig,
    pub layout: LayoutConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}

/// Undo/redo settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Snapshots kept before the oldest is dropped
    pub max_snapshots: usize,
    /// Quiet period before a payload or position edit is recorded
    pub debounce_ms: u64,
    /// zstd level for stored snapshots
    pub compression_level: i32,
}

impl HistoryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_snapshots: 100,
            debounce_ms: 500,
            compression_level: 3,
        }
    }
}

/// Placement settings for new nodes, templates and auto-layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Position of the first node on an empty canvas
    pub origin: Position,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(100.0, 100.0),
            spacing_x: 400.0,
            spacing_y: 250.0,
            node_width: 320.0,
            node_height: 200.0,
        }
    }
}

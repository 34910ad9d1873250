//! Change notifications for canvas consumers
//!
//! The editor reports every payload change, status change and history
//! cursor move through an [`EventSink`], so the engine does not depend on
//! how a host delivers them.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::payload::NodeData;
use crate::status::ExecutionStatus;
use crate::types::NodeId;

/// Trait for sending canvas events
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel closed)
    fn send(&self, event: CanvasEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// Events emitted by the editor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    /// A node's payload changed, by user edit or propagation
    #[serde(rename_all = "camelCase")]
    NodeDataChanged { node_id: NodeId, data: NodeData },

    /// A node's execution status was set
    #[serde(rename_all = "camelCase")]
    StatusChanged {
        node_id: NodeId,
        status: ExecutionStatus,
    },

    /// Undo/redo availability may have changed
    #[serde(rename_all = "camelCase")]
    HistoryChanged { can_undo: bool, can_redo: bool },
}

impl CanvasEvent {
    pub fn node_data_changed(node_id: &str, data: NodeData) -> Self {
        Self::NodeDataChanged {
            node_id: node_id.to_string(),
            data,
        }
    }

    pub fn status_changed(node_id: &str, status: ExecutionStatus) -> Self {
        Self::StatusChanged {
            node_id: node_id.to_string(),
            status,
        }
    }
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: CanvasEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: Mutex<Vec<CanvasEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: CanvasEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

/// Forwards every event to a closure
///
/// ```
/// use canvas_engine::{CallbackEventSink, CanvasEvent, EventSink};
///
/// let sink = CallbackEventSink::new(|event: CanvasEvent| {
///     println!("{:?}", event);
/// });
/// sink.send(CanvasEvent::HistoryChanged { can_undo: false, can_redo: false }).unwrap();
/// ```
pub struct CallbackEventSink<F> {
    callback: F,
}

impl<F> CallbackEventSink<F>
where
    F: Fn(CanvasEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventSink for CallbackEventSink<F>
where
    F: Fn(CanvasEvent) + Send + Sync,
{
    fn send(&self, event: CanvasEvent) -> Result<(), EventError> {
        (self.callback)(event);
        Ok(())
    }
}

//! Layer events
//!
//! Provides:
//! - Event types for selection, edits and render requests
//! - Event dispatcher for publishing events to subscribers

use tokio::sync::broadcast;

/// Editable layer event types
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent {
    /// Selection changed; `None` when the selection was cleared
    SelectionChanged { id: Option<i64> },
    /// Listener was handed a new geometry for the element
    ElementModified { id: i64 },
    /// Listener was asked to delete the element
    ElementDeleted { id: i64 },
    /// Overlay handles were rebuilt
    OverlaySynced { points: usize },
    /// Render set must be rebuilt
    RefreshRequested,
    /// Frame must be redrawn
    RedrawRequested,
}

impl std::fmt::Display for LayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerEvent::SelectionChanged { id: Some(id) } => write!(f, "Selected element {}", id),
            LayerEvent::SelectionChanged { id: None } => write!(f, "Selection cleared"),
            LayerEvent::ElementModified { id } => write!(f, "Element {} modified", id),
            LayerEvent::ElementDeleted { id } => write!(f, "Element {} deleted", id),
            LayerEvent::OverlaySynced { points } => write!(f, "Overlay synced ({} points)", points),
            LayerEvent::RefreshRequested => write!(f, "Refresh requested"),
            LayerEvent::RedrawRequested => write!(f, "Redraw requested"),
        }
    }
}

/// Event dispatcher for publishing layer events to subscribers
#[derive(Clone)]
pub struct LayerEventDispatcher {
    /// Broadcast sender channel for layer events.
    tx: broadcast::Sender<LayerEvent>,
}

impl LayerEventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Size of the broadcast buffer
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<LayerEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of subscribers reached; zero when nobody listens.
    pub fn publish(&self, event: LayerEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LayerEventDispatcher {
    fn default() -> Self {
        Self::new(256)
    }
}

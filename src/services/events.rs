//! Event system for record mutations
//!
//! Services emit one event per successful create, update or delete.
//! Useful for:
//! - Audit logging
//! - Refreshing derived views

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::models::Collection;

/// Record events emitted by services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created { collection: Collection, id: String },
    Updated { collection: Collection, id: String },
    Deleted { collection: Collection, id: String },
}

impl StoreEvent {
    pub fn collection(&self) -> Collection {
        match self {
            StoreEvent::Created { collection, .. }
            | StoreEvent::Updated { collection, .. }
            | StoreEvent::Deleted { collection, .. } => *collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            StoreEvent::Created { id, .. }
            | StoreEvent::Updated { id, .. }
            | StoreEvent::Deleted { id, .. } => id,
        }
    }
}

/// Trait for event listeners
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &StoreEvent);
}

/// Event bus for broadcasting record events
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: StoreEvent) {
        trace!(event = ?event, "Emitting store event");
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging event listener for audit trails
pub struct LoggingEventListener;

impl EventListener for LoggingEventListener {
    fn on_event(&self, event: &StoreEvent) {
        match event {
            StoreEvent::Created { collection, id } => {
                info!(collection = %collection, id = %id, "Record created");
            }
            StoreEvent::Updated { collection, id } => {
                debug!(collection = %collection, id = %id, "Record updated");
            }
            StoreEvent::Deleted { collection, id } => {
                info!(collection = %collection, id = %id, "Record deleted");
            }
        }
    }
}

/// Spawn a background task that logs all events
pub fn spawn_logging_listener(event_bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
    let mut receiver = event_bus.subscribe();
    let listener = LoggingEventListener;

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => listener.on_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event listener lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}

//! In-process event bus backed by a `tokio::sync::broadcast` channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// A domain event emitted by the collection, media, or sharing surfaces.
///
/// Event types are dot-separated names (`"userdex.updated"`,
/// `"media.uploaded"`), subjects are path-like (`"userdex/{user}/{dex}"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub subject: String,
    #[serde(rename = "dataVersion")]
    pub data_version: String,
    pub data: serde_json::Value,
    #[serde(rename = "eventTime")]
    pub event_time: DateTime<Utc>,
}

impl DomainEvent {
    /// Create a new event with an empty payload.
    pub fn new(event_type: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            subject: subject.into(),
            data_version: "1.0".to_string(),
            data: serde_json::Value::Object(Default::default()),
            event_time: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// In-process fan-out event bus.
///
/// Shared via `Arc<EventBus>`; any number of subscribers independently
/// receive every published event. Publishing with no subscribers is fine.
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of live subscribers.
    pub fn publish(&self, event: DomainEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            // No subscribers; the event is simply dropped.
            Err(_) => 0,
        }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

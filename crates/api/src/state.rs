use std::sync::Arc;

use dexvault_cloud::{BlobStore, DirectoryApi, SearchIndexClient};
use dexvault_events::{EventBus, TopicDelivery};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dexvault_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-process event bus.
    pub event_bus: Arc<EventBus>,
    /// Best-effort outbound event delivery.
    pub topic: Arc<TopicDelivery>,
    /// Blob storage provider.
    pub blob: Arc<dyn BlobStore>,
    /// Identity directory; `None` when unconfigured (admin resolution
    /// fails closed).
    pub directory: Option<Arc<dyn DirectoryApi>>,
    /// Managed search index; `None` forces the local search path.
    pub search_index: Option<Arc<SearchIndexClient>>,
}

impl AppState {
    /// Publish an event on the in-process bus and deliver it outbound,
    /// best-effort. Never fails the caller.
    pub async fn emit(&self, event: dexvault_events::DomainEvent) {
        self.event_bus.publish(event.clone());
        self.topic.emit_best_effort(event).await;
    }
}

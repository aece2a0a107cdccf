//! Best-effort delivery of domain events to an external topic endpoint.
//!
//! Delivery is fire-and-forget from the caller's perspective: a failed
//! or unconfigured delivery logs a warning and nothing more. Event
//! emission must never fail the primary operation it accompanies.

use std::time::Duration;

use crate::bus::DomainEvent;

/// HTTP request timeout for a delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

/// Topic endpoint configuration, typically loaded from the environment.
#[derive(Debug, Clone)]
pub struct TopicConfig {
    pub endpoint: String,
    pub key: String,
}

impl TopicConfig {
    /// Load from `EVENT_TOPIC_ENDPOINT` / `EVENT_TOPIC_KEY`; `None` when
    /// either is unset (delivery disabled).
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("EVENT_TOPIC_ENDPOINT").ok()?;
        let key = std::env::var("EVENT_TOPIC_KEY").ok()?;
        if endpoint.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self { endpoint, key })
    }
}

/// Error type for a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Topic endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

/// Delivers domain events to an external topic endpoint.
pub struct TopicDelivery {
    client: reqwest::Client,
    config: Option<TopicConfig>,
}

impl TopicDelivery {
    pub fn new(config: Option<TopicConfig>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Whether an endpoint is configured at all.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Deliver one event, single attempt.
    pub async fn deliver(&self, event: &DomainEvent) -> Result<(), DeliveryError> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        // Topic endpoints accept a batch; we always send a singleton.
        let response = self
            .client
            .post(&config.endpoint)
            .header("aeg-sas-key", &config.key)
            .json(&[event])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }

    /// Deliver one event, swallowing every failure.
    pub async fn emit_best_effort(&self, event: DomainEvent) {
        if let Err(e) = self.deliver(&event).await {
            tracing::warn!(
                event_type = %event.event_type,
                subject = %event.subject,
                error = %e,
                "Event delivery failed (ignored)"
            );
        } else {
            tracing::debug!(event_type = %event.event_type, "Event emitted");
        }
    }
}

//! Event bus and best-effort outbound notification delivery.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] -- the canonical event envelope.
//! - [`TopicDelivery`] -- posts events to an external topic endpoint;
//!   failures are logged and swallowed, never surfaced to the caller.

pub mod bus;
pub mod delivery;

pub use bus::{DomainEvent, EventBus};
pub use delivery::{TopicConfig, TopicDelivery};

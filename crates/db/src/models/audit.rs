//! Audit log entity model and DTOs.
//!
//! Audit rows record admin actions and are immutable once created.

use dexvault_core::types::{DexId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: i64,
    pub timestamp: Timestamp,
    #[serde(rename = "actorUserId")]
    pub actor_user_id: String,
    #[serde(rename = "actionType")]
    pub action_type: String,
    #[serde(rename = "targetUserId")]
    pub target_user_id: Option<String>,
    #[serde(rename = "pokemonId")]
    pub pokemon_id: Option<DexId>,
    #[serde(rename = "details")]
    pub details_json: Option<serde_json::Value>,
    #[serde(skip)]
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    #[serde(rename = "actorUserId", default)]
    pub actor_user_id: String,
    #[serde(rename = "actionType")]
    pub action_type: String,
    #[serde(rename = "targetUserId")]
    pub target_user_id: Option<String>,
    #[serde(rename = "pokemonId")]
    pub pokemon_id: Option<DexId>,
    #[serde(rename = "details")]
    pub details_json: Option<serde_json::Value>,
}

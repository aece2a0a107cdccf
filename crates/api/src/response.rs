//! Shared response types for mutation endpoints.

use dexvault_core::types::DexId;
use serde::Serialize;

/// Standard acknowledgement for collection and media mutations.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub action: &'static str,
    #[serde(rename = "pokemonId", skip_serializing_if = "Option::is_none")]
    pub pokemon_id: Option<DexId>,
}

impl ActionResponse {
    pub fn new(action: &'static str, message: impl Into<String>, pokemon_id: Option<DexId>) -> Self {
        Self {
            success: true,
            message: message.into(),
            action,
            pokemon_id,
        }
    }
}

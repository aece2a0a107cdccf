//! Handlers for the `/userdex` collection resource.
//!
//! The store's central invariant: a stored entry always has
//! `caught = true`. Marking a species uncaught deletes its row; uncatching
//! an absent species is a no-op. All operations act on the authenticated
//! principal's own entries only.

use axum::extract::State;
use axum::Json;
use dexvault_core::types::DexId;
use dexvault_db::models::collection_entry::{CollectionItem, UpsertCaught, WriteAction};
use dexvault_db::repositories::CollectionRepo;
use dexvault_events::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ClientPrincipal;
use crate::response::ActionResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `GET /userdex`.
#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub count: usize,
    pub pokemon: Vec<CollectionItem>,
}

/// Request body for `PUT /userdex`.
#[derive(Debug, Deserialize)]
pub struct PutEntryRequest {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: Option<DexId>,
    pub caught: Option<bool>,
    pub shiny: Option<bool>,
    pub notes: Option<String>,
    pub screenshot: Option<String>,
}

/// Request body for `DELETE /userdex`.
#[derive(Debug, Deserialize)]
pub struct DeleteEntryRequest {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: Option<DexId>,
}

/// Validate a client-supplied dex number.
fn require_pokemon_id(id: Option<DexId>) -> AppResult<DexId> {
    match id {
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(AppError::BadRequest("pokemonId must be positive".into())),
        None => Err(AppError::BadRequest(
            "Missing required parameter: pokemonId".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /userdex
///
/// The authenticated user's complete collection.
pub async fn get_collection(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
) -> AppResult<Json<CollectionResponse>> {
    let entries = CollectionRepo::list_by_user(&state.pool, &principal.user_id).await?;

    Ok(Json(CollectionResponse {
        user_id: principal.user_id,
        count: entries.len(),
        pokemon: entries.iter().map(CollectionItem::from).collect(),
    }))
}

/// PUT /userdex
///
/// Upsert-or-delete a collection entry per the asymmetric write policy.
pub async fn put_entry(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
    Json(input): Json<PutEntryRequest>,
) -> AppResult<Json<ActionResponse>> {
    let pokemon_id = require_pokemon_id(input.pokemon_id)?;

    let upsert = UpsertCaught {
        shiny: input.shiny,
        notes: input.notes,
        screenshot: input.screenshot,
    };

    let action =
        CollectionRepo::apply_write(&state.pool, &principal.user_id, pokemon_id, input.caught, &upsert)
            .await?;

    if action == WriteAction::None {
        return Ok(Json(ActionResponse::new("none", "No action needed", Some(pokemon_id))));
    }

    state
        .emit(
            DomainEvent::new(
                "userdex.updated",
                format!("userdex/{}/{pokemon_id}", principal.user_id),
            )
            .with_data(serde_json::json!({
                "userId": principal.user_id,
                "pokemonId": pokemon_id,
                "action": action.as_str(),
                "caught": action != WriteAction::Uncaught,
            })),
        )
        .await;

    tracing::debug!(
        user_id = %principal.user_id,
        pokemon_id,
        action = action.as_str(),
        "Collection entry written",
    );

    Ok(Json(ActionResponse::new(
        action.as_str(),
        format!("Pokémon {} successfully", action.as_str()),
        Some(pokemon_id),
    )))
}

/// DELETE /userdex
///
/// Delete a collection entry. Idempotent: always 200, even when the
/// entry was already absent.
pub async fn delete_entry(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
    Json(input): Json<DeleteEntryRequest>,
) -> AppResult<Json<ActionResponse>> {
    let pokemon_id = require_pokemon_id(input.pokemon_id)?;

    let deleted = CollectionRepo::remove_caught(&state.pool, &principal.user_id, pokemon_id).await?;

    if deleted {
        state
            .emit(
                DomainEvent::new(
                    "userdex.updated",
                    format!("userdex/{}/{pokemon_id}", principal.user_id),
                )
                .with_data(serde_json::json!({
                    "userId": principal.user_id,
                    "pokemonId": pokemon_id,
                    "action": "uncaught",
                    "caught": false,
                })),
            )
            .await;
    }

    Ok(Json(ActionResponse::new(
        if deleted { "uncaught" } else { "none" },
        "Entry removed",
        Some(pokemon_id),
    )))
}

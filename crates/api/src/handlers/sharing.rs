//! Handlers for the read-only sharing surface.
//!
//! A share token, once issued, is stable across repeated enables; only
//! an explicit unshare clears it. The shared view is a sanitized
//! projection: no user id, no edit affordances, and screenshots are
//! served as time-boxed signed URLs rather than permanent public ones.

use axum::extract::{Path, State};
use axum::Json;
use dexvault_core::share::{generate_share_token, is_plausible_token};
use dexvault_core::types::{DexId, Timestamp};
use dexvault_db::models::collection_entry::CollectionEntry;
use dexvault_db::repositories::CollectionRepo;
use dexvault_events::DomainEvent;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ClientPrincipal;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response body for `POST /userdex/share`.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    #[serde(rename = "shareId")]
    pub share_id: String,
}

/// One entry in a shared snapshot. Deliberately omits the owner's id.
#[derive(Debug, Serialize)]
pub struct SharedItem {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
    pub caught: bool,
    pub shiny: bool,
    pub notes: String,
    pub screenshot: Option<String>,
    #[serde(rename = "screenshotShiny")]
    pub screenshot_shiny: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

/// Response body for `GET /userdex/shared/{shareId}`.
#[derive(Debug, Serialize)]
pub struct SharedViewResponse {
    #[serde(rename = "shareId")]
    pub share_id: String,
    pub count: usize,
    pub pokemon: Vec<SharedItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /userdex/share
///
/// Enable sharing: reuse the existing token if one is stamped, otherwise
/// generate one and stamp it onto every entry the user owns. Enabling
/// twice never rotates the token.
pub async fn enable_sharing(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
) -> AppResult<Json<ShareResponse>> {
    let existing = CollectionRepo::find_share_id(&state.pool, &principal.user_id).await?;
    let newly_enabled = existing.is_none();
    let share_id = existing.unwrap_or_else(generate_share_token);

    // Stamp unconditionally so entries caught since the last enable are
    // covered too; the token itself never rotates while enabled.
    CollectionRepo::set_share_id(&state.pool, &principal.user_id, &share_id).await?;

    if newly_enabled {
        state
            .emit(
                DomainEvent::new("collection.shared", format!("userdex/{}", principal.user_id))
                    .with_data(serde_json::json!({ "userId": principal.user_id })),
            )
            .await;
    }

    Ok(Json(ShareResponse { share_id }))
}

/// POST /userdex/unshare
///
/// Disable sharing by clearing the token from every entry.
pub async fn disable_sharing(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let cleared = CollectionRepo::clear_share_id(&state.pool, &principal.user_id).await?;

    if cleared > 0 {
        state
            .emit(
                DomainEvent::new("collection.unshared", format!("userdex/{}", principal.user_id))
                    .with_data(serde_json::json!({ "userId": principal.user_id })),
            )
            .await;
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /userdex/shared/{shareId}
///
/// Public read-only snapshot of a shared collection. 404 for unknown or
/// revoked tokens.
pub async fn shared_view(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> AppResult<Json<SharedViewResponse>> {
    if !is_plausible_token(&share_id) {
        return Err(AppError::Core(dexvault_core::error::CoreError::NotFound {
            entity: "Share",
            id: 0,
        }));
    }

    let entries = CollectionRepo::list_by_share_id(&state.pool, &share_id).await?;
    if entries.is_empty() {
        return Err(AppError::Core(dexvault_core::error::CoreError::NotFound {
            entity: "Share",
            id: 0,
        }));
    }

    let mut pokemon = Vec::with_capacity(entries.len());
    for entry in &entries {
        pokemon.push(sanitize_entry(&state, entry).await);
    }

    Ok(Json(SharedViewResponse {
        share_id,
        count: pokemon.len(),
        pokemon,
    }))
}

/// Project an entry into its shared form, swapping stored blob URLs for
/// time-boxed signed ones. A signing failure degrades to omitting the
/// screenshot rather than failing the whole view.
async fn sanitize_entry(state: &AppState, entry: &CollectionEntry) -> SharedItem {
    SharedItem {
        pokemon_id: entry.pokemon_id,
        caught: entry.caught,
        shiny: entry.shiny,
        notes: entry.notes.clone(),
        screenshot: sign_url(state, entry.screenshot.as_deref()).await,
        screenshot_shiny: sign_url(state, entry.screenshot_shiny.as_deref()).await,
        updated_at: entry.updated_at,
    }
}

async fn sign_url(state: &AppState, url: Option<&str>) -> Option<String> {
    let url = url?;
    let blob_name = state.blob.blob_name_from_url(url)?;
    match state.blob.signed_get_url(&blob_name).await {
        Ok(signed) => Some(signed),
        Err(e) => {
            tracing::warn!(blob = %blob_name, error = %e, "Failed to sign shared screenshot URL");
            None
        }
    }
}

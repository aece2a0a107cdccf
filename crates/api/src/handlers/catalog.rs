//! Handlers for the `/pokedex` static catalog surface.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dexvault_core::catalog::species_for_region;
use dexvault_core::regions::{all_regions, is_valid_region};
use dexvault_db::models::catalog::CatalogItem;
use dexvault_db::repositories::CatalogRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /pokedex`.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub region: Option<String>,
}

/// Response body for `GET /pokedex`.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub region: String,
    pub count: usize,
    pub pokemon: Vec<CatalogItem>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET /pokedex?region=
///
/// All species of one region, sorted by dex number. 400 with the list of
/// available regions when the region is missing or unknown.
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Response> {
    let Some(region) = params.region.as_deref().filter(|r| !r.is_empty()) else {
        return Ok(region_error("Missing required parameter: region"));
    };

    if !is_valid_region(region) {
        return Ok(region_error(&format!("Invalid region: {region}")));
    }

    let region = region.to_ascii_lowercase();
    let cached = CatalogRepo::list_by_region(&state.pool, &region).await?;

    let pokemon: Vec<CatalogItem> = if cached.is_empty() {
        // Cache not yet seeded; fall back to the static universe.
        species_for_region(&region)
            .unwrap_or_default()
            .iter()
            .map(|s| CatalogItem {
                id: s.id,
                name: s.name.clone(),
                sprite: s.sprite.clone(),
                sprite_shiny: s.sprite_shiny.clone(),
                region: s.region.clone(),
            })
            .collect()
    } else {
        cached.iter().map(CatalogItem::from).collect()
    };

    Ok(Json(CatalogResponse {
        count: pokemon.len(),
        region,
        pokemon,
    })
    .into_response())
}

fn region_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": message,
            "availableRegions": all_regions(),
        })),
    )
        .into_response()
}

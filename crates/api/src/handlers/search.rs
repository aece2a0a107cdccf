//! Handlers for the `/search` surface.
//!
//! Two paths produce the same response shape:
//!
//! - **Local:** join the catalog cache with the caller's collection
//!   entries into candidates, apply the hard filters, score with the
//!   weighted keyword scorer, rank, truncate.
//! - **Delegated:** when a managed search index is configured (and the
//!   caller did not opt out with `ai=false`), query it for species
//!   matches, overlay the caller's own caught/shiny/notes state, then
//!   re-apply the filter predicates locally -- the index holds species
//!   metadata, not per-user state. Index failures fall back to the
//!   local path rather than failing the request.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use dexvault_core::catalog::{species_fallback, sprite_shiny_url, sprite_url};
use dexvault_core::regions::is_valid_region;
use dexvault_core::search::{clamp_top_k, rank, Candidate, SearchFilters};
use dexvault_core::types::DexId;
use dexvault_db::models::collection_entry::CollectionEntry;
use dexvault_db::repositories::{CatalogRepo, CollectionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ClientPrincipal;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    pub region: Option<String>,
    pub caught: Option<bool>,
    pub shiny: Option<bool>,
    /// Filter on screenshot presence.
    pub screenshot: Option<bool>,
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
    /// Set to `false` to force the local path even when an index is
    /// configured.
    pub ai: Option<bool>,
}

/// One ranked search result.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
    pub name: String,
    pub sprite: String,
    #[serde(rename = "spriteShiny")]
    pub sprite_shiny: String,
    pub types: Vec<String>,
    pub region: Option<String>,
    pub caught: bool,
    pub shiny: bool,
    pub notes: String,
    pub screenshot: Option<String>,
    pub similarity: f64,
}

/// Response body for `GET /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    #[serde(rename = "usedAI")]
    pub used_ai: bool,
    pub results: Vec<SearchResult>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET /search
pub async fn search(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.q.clone().unwrap_or_default();
    let top_k = clamp_top_k(params.top_k);

    if let Some(region) = &params.region {
        if !is_valid_region(region) {
            return Err(AppError::BadRequest(format!("Invalid region: {region}")));
        }
    }

    let filters = SearchFilters {
        region: params.region.clone(),
        caught: params.caught,
        shiny: params.shiny,
        has_screenshot: params.screenshot,
    };

    let owned = CollectionRepo::list_by_user(&state.pool, &principal.user_id).await?;
    let overlay: HashMap<DexId, &CollectionEntry> =
        owned.iter().map(|e| (e.pokemon_id, e)).collect();

    // Delegated path, unless the caller opted out.
    if params.ai != Some(false) {
        if let Some(index) = &state.search_index {
            match delegated_search(index, &query, &filters, &overlay, top_k).await {
                Ok(results) => {
                    return Ok(Json(SearchResponse {
                        count: results.len(),
                        query,
                        used_ai: true,
                        results,
                    }));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Search index failed; falling back to local search");
                }
            }
        }
    }

    let results = local_search(&state, &query, &filters, &overlay, top_k).await?;
    Ok(Json(SearchResponse {
        count: results.len(),
        query,
        used_ai: false,
        results,
    }))
}

// ---------------------------------------------------------------------------
// Local path
// ---------------------------------------------------------------------------

async fn local_search(
    state: &AppState,
    query: &str,
    filters: &SearchFilters,
    overlay: &HashMap<DexId, &CollectionEntry>,
    top_k: usize,
) -> AppResult<Vec<SearchResult>> {
    let species = CatalogRepo::list_all(&state.pool).await?;

    let candidates: Vec<Candidate> = species
        .iter()
        .map(|s| {
            let entry = overlay.get(&s.pokemon_id);
            Candidate {
                pokemon_id: s.pokemon_id,
                name: s.name.clone(),
                types: s.type_names(),
                region: s.region.clone(),
                // Species not owned appear with caught = false,
                // synthesized here, never persisted.
                caught: entry.is_some(),
                shiny: entry.map(|e| e.shiny).unwrap_or(false),
                notes: entry.map(|e| e.notes.clone()).unwrap_or_default(),
                screenshot: entry.and_then(|e| e.screenshot.clone()),
            }
        })
        .filter(|c| c.matches(filters))
        .collect();

    let ranked = rank(candidates, query, top_k);
    Ok(ranked
        .into_iter()
        .map(|(c, score)| to_result(c, f64::from(score)))
        .collect())
}

// ---------------------------------------------------------------------------
// Delegated path
// ---------------------------------------------------------------------------

async fn delegated_search(
    index: &dexvault_cloud::SearchIndexClient,
    query: &str,
    filters: &SearchFilters,
    overlay: &HashMap<DexId, &CollectionEntry>,
    top_k: usize,
) -> Result<Vec<SearchResult>, dexvault_cloud::search_index::SearchIndexError> {
    let filter = dexvault_cloud::search_index::build_region_filter(filters.region.as_deref());
    let docs = index.query(query, filter.as_deref(), top_k).await?;

    // Enrich index docs with the caller's own state, then re-apply the
    // per-user predicates the index cannot evaluate.
    let results = docs
        .into_iter()
        .map(|doc| {
            let fallback = species_fallback(doc.pokemon_id);
            let entry = overlay.get(&doc.pokemon_id);
            let candidate = Candidate {
                pokemon_id: doc.pokemon_id,
                name: doc.name.unwrap_or(fallback.name),
                types: doc.types,
                region: doc.region.or(fallback.region),
                caught: entry.is_some(),
                shiny: entry.map(|e| e.shiny).unwrap_or(false),
                notes: entry.map(|e| e.notes.clone()).unwrap_or_default(),
                screenshot: entry.and_then(|e| e.screenshot.clone()),
            };
            (candidate, doc.score.unwrap_or(0.0))
        })
        .filter(|(c, _)| c.matches(filters))
        .take(top_k)
        .map(|(c, score)| to_result(c, (score * 10_000.0).round() / 10_000.0))
        .collect();

    Ok(results)
}

fn to_result(c: Candidate, similarity: f64) -> SearchResult {
    SearchResult {
        sprite: sprite_url(c.pokemon_id),
        sprite_shiny: sprite_shiny_url(c.pokemon_id),
        pokemon_id: c.pokemon_id,
        name: c.name,
        types: c.types,
        region: c.region,
        caught: c.caught,
        shiny: c.shiny,
        notes: c.notes,
        screenshot: c.screenshot,
        similarity,
    }
}

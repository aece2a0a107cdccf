//! Handlers for the `/media` blob upload surface.
//!
//! Uploads require the referenced species to already be caught by the
//! caller: the blob is stored first, then the reference is recorded on
//! the collection entry. Blob upload and document update are not
//! transactional; when the second step fails the uploaded blob is
//! deleted as compensation so no orphan survives the request.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use dexvault_core::error::CoreError;
use dexvault_core::media::{blob_name, blob_owned_by, decode_image_payload};
use dexvault_core::types::DexId;
use dexvault_db::repositories::CollectionRepo;
use dexvault_events::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ClientPrincipal;
use crate::state::AppState;

/// Default content type when the upload does not declare one.
const DEFAULT_CONTENT_TYPE: &str = "image/png";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /media`.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: Option<DexId>,
    /// Base64-encoded file payload; a `data:image/...;base64,` prefix is
    /// tolerated.
    pub file: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    /// Store into the shiny slot instead of the regular one.
    #[serde(default)]
    pub shiny: bool,
}

/// Response body for `POST /media`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
    #[serde(rename = "blobName")]
    pub blob_name: String,
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
}

/// Query parameters for `DELETE /media`.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "blobName")]
    pub blob_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /media
///
/// Store a screenshot blob and record its URL on the caller's collection
/// entry. 404 when the species is not caught by the caller.
pub async fn upload(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
    Json(input): Json<UploadRequest>,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let pokemon_id = input
        .pokemon_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Missing required parameter: pokemonId".into()))?;
    let file = input
        .file
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required parameter: file".into()))?;

    // The species must already be marked caught by the caller.
    let entry = CollectionRepo::get_one(&state.pool, &principal.user_id, pokemon_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CollectionEntry",
            id: pokemon_id,
        }))?;

    let bytes = decode_image_payload(file).map_err(AppError::Core)?;
    let content_type = input.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);

    let name = blob_name(&principal.user_id, pokemon_id, input.file_name.as_deref());
    let url = state
        .blob
        .put(&name, bytes, content_type)
        .await
        .map_err(|e| AppError::Core(CoreError::Upstream(e.to_string())))?;

    // Record the reference; on failure, delete the blob we just stored so
    // the two-step write leaves no orphan.
    let recorded = CollectionRepo::set_screenshot(
        &state.pool,
        &principal.user_id,
        pokemon_id,
        &url,
        input.shiny,
    )
    .await;

    match recorded {
        Ok(true) => {}
        Ok(false) => {
            let _ = state.blob.delete(&name).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "CollectionEntry",
                id: pokemon_id,
            }));
        }
        Err(e) => {
            let _ = state.blob.delete(&name).await;
            return Err(e.into());
        }
    }

    state
        .emit(
            DomainEvent::new("media.uploaded", format!("media/{}/{pokemon_id}", principal.user_id))
                .with_data(serde_json::json!({
                    "userId": principal.user_id,
                    "pokemonId": pokemon_id,
                    "blobName": name,
                    "blobUrl": url,
                    "contentType": content_type,
                    "shiny": input.shiny,
                })),
        )
        .await;

    tracing::debug!(
        user_id = %principal.user_id,
        pokemon_id,
        blob = %name,
        previous = entry.screenshot.is_some(),
        "Screenshot uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message: "File uploaded successfully".into(),
            url,
            blob_name: name,
            pokemon_id,
        }),
    ))
}

/// DELETE /media?blobName=
///
/// Delete an owned blob and clear any collection-entry slot referencing
/// it. 403 when the blob name is not prefixed by the caller's userId.
pub async fn delete(
    ClientPrincipal(principal): ClientPrincipal,
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<serde_json::Value>> {
    let name = params
        .blob_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required parameter: blobName".into()))?;

    if !blob_owned_by(name, &principal.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot delete another user's media".into(),
        )));
    }

    state.blob.delete(name).await.map_err(|e| match e {
        dexvault_cloud::BlobError::NotFound(_) => AppError::Core(CoreError::NotFound {
            entity: "Blob",
            id: 0,
        }),
        other => AppError::Core(CoreError::Upstream(other.to_string())),
    })?;

    // Clear whichever slot referenced the blob; a dangling reference on
    // failure here is the accepted inconsistency window.
    let url = state.blob.public_url(name);
    let _ = CollectionRepo::clear_screenshot_by_url(&state.pool, &principal.user_id, &url).await;

    state
        .emit(
            DomainEvent::new("media.deleted", format!("media/{}", principal.user_id))
                .with_data(serde_json::json!({
                    "userId": principal.user_id,
                    "blobName": name,
                })),
        )
        .await;

    Ok(Json(serde_json::json!({ "success": true, "blobName": name })))
}

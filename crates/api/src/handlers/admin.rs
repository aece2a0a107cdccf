//! Handlers for the `/admin` surface: account management and media
//! moderation.
//!
//! All handlers require directory-resolved admin access via
//! [`RequireAdmin`]. Each mutating action appends an audit entry;
//! audit-write failures are logged and never mask the action's outcome.

use axum::extract::{Query, State};
use axum::Json;
use dexvault_core::error::CoreError;
use dexvault_core::roles::{ADMIN_APP_ROLE, ROLE_VALUE_ADMIN, ROLE_VALUE_USER};
use dexvault_core::types::DexId;
use dexvault_db::models::audit::CreateAuditLog;
use dexvault_db::models::collection_entry::MediaRecord;
use dexvault_db::repositories::{AuditLogRepo, CollectionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One managed account, as shown in the admin dashboard.
#[derive(Debug, Serialize)]
pub struct ManagedUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub blocked: bool,
}

/// Response body for `GET /admin/users`.
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<ManagedUser>,
    pub count: usize,
}

/// Request body for the account mutation endpoints.
#[derive(Debug, Deserialize)]
pub struct TargetUserRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Response body for `GET /admin/media`.
#[derive(Debug, Serialize)]
pub struct ListMediaResponse {
    pub success: bool,
    pub media: Vec<MediaRecord>,
    pub count: usize,
}

/// Request body for `DELETE /admin/media`.
#[derive(Debug, Deserialize)]
pub struct DeleteScreenshotRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "pokemonId")]
    pub pokemon_id: Option<DexId>,
    #[serde(default)]
    pub shiny: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn directory(state: &AppState) -> AppResult<&dyn dexvault_cloud::DirectoryApi> {
    state
        .directory
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Upstream("Directory not configured".into())))
}

fn require_user_id(id: Option<String>) -> AppResult<String> {
    id.filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required parameter: userId".into()))
}

/// Append an audit entry for an admin action, best-effort.
async fn audit(
    state: &AppState,
    actor: &str,
    action_type: &str,
    target: Option<&str>,
    pokemon_id: Option<DexId>,
) {
    let entry = CreateAuditLog {
        actor_user_id: actor.to_string(),
        action_type: action_type.to_string(),
        target_user_id: target.map(str::to_string),
        pokemon_id,
        details_json: None,
    };
    if let Err(e) = AuditLogRepo::insert(&state.pool, &entry).await {
        tracing::warn!(action_type, error = %e, "Failed to record audit entry");
    }
}

// ---------------------------------------------------------------------------
// Account management
// ---------------------------------------------------------------------------

/// GET /admin/users
///
/// List directory accounts with admin-role and blocked status.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ListUsersResponse>> {
    let dir = directory(&state)?;

    let listed = dir
        .list_users()
        .await
        .map_err(|e| AppError::Core(CoreError::Upstream(e.to_string())))?;

    let mut users = Vec::with_capacity(listed.len());
    for u in listed {
        // Role lookup failures degrade to non-admin rather than failing
        // the listing.
        let is_admin = match dir.app_roles_for(&u.id).await {
            Ok(roles) => roles.iter().any(|r| r == ADMIN_APP_ROLE),
            Err(_) => false,
        };
        users.push(ManagedUser {
            name: u
                .display_name
                .clone()
                .or_else(|| u.user_principal_name.clone())
                .or_else(|| u.mail.clone())
                .unwrap_or_else(|| u.id.clone()),
            email: u.mail.or(u.user_principal_name),
            is_admin,
            blocked: u.account_enabled == Some(false),
            id: u.id,
        });
    }

    Ok(Json(ListUsersResponse {
        count: users.len(),
        users,
    }))
}

/// POST /admin/users/promote
pub async fn promote_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<TargetUserRequest>,
) -> AppResult<Json<serde_json::Value>> {
    set_role(&state, &admin.user_id, input.user_id, ROLE_VALUE_ADMIN, "promoteAdmin").await
}

/// POST /admin/users/demote
pub async fn demote_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<TargetUserRequest>,
) -> AppResult<Json<serde_json::Value>> {
    set_role(&state, &admin.user_id, input.user_id, ROLE_VALUE_USER, "demoteAdmin").await
}

async fn set_role(
    state: &AppState,
    actor: &str,
    target: Option<String>,
    role_value: &str,
    action_type: &str,
) -> AppResult<Json<serde_json::Value>> {
    let target = require_user_id(target)?;
    let dir = directory(state)?;

    dir.assign_role(&target, role_value)
        .await
        .map_err(|e| AppError::Core(CoreError::Upstream(e.to_string())))?;

    audit(state, actor, action_type, Some(&target), None).await;
    tracing::info!(actor, target = %target, role = role_value, "Directory role updated");

    Ok(Json(serde_json::json!({ "success": true, "userId": target })))
}

/// POST /admin/users/block
pub async fn block_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<TargetUserRequest>,
) -> AppResult<Json<serde_json::Value>> {
    set_blocked(&state, &admin.user_id, input.user_id, true, "blockUser").await
}

/// POST /admin/users/unblock
pub async fn unblock_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<TargetUserRequest>,
) -> AppResult<Json<serde_json::Value>> {
    set_blocked(&state, &admin.user_id, input.user_id, false, "unblockUser").await
}

async fn set_blocked(
    state: &AppState,
    actor: &str,
    target: Option<String>,
    blocked: bool,
    action_type: &str,
) -> AppResult<Json<serde_json::Value>> {
    let target = require_user_id(target)?;
    let dir = directory(state)?;

    dir.set_account_enabled(&target, !blocked)
        .await
        .map_err(|e| AppError::Core(CoreError::Upstream(e.to_string())))?;

    audit(state, actor, action_type, Some(&target), None).await;

    Ok(Json(serde_json::json!({ "success": true, "userId": target, "blocked": blocked })))
}

// ---------------------------------------------------------------------------
// Media moderation
// ---------------------------------------------------------------------------

/// GET /admin/media
///
/// All stored screenshot references across every user.
pub async fn list_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ListMediaResponse>> {
    let media = CollectionRepo::list_media(&state.pool).await?;

    Ok(Json(ListMediaResponse {
        success: true,
        count: media.len(),
        media,
    }))
}

/// DELETE /admin/media
///
/// Clear any user's screenshot slot (moderation). 404 when the entry has
/// no screenshot in that slot. The underlying blob is deleted
/// best-effort; an already-gone blob does not fail the moderation.
pub async fn delete_screenshot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DeleteScreenshotRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let target = require_user_id(input.user_id)?;
    let pokemon_id = input
        .pokemon_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Missing required parameter: pokemonId".into()))?;

    // Capture the stored URL before clearing so the blob can be removed.
    let entry = CollectionRepo::get_one(&state.pool, &target, pokemon_id).await?;
    let url = entry.as_ref().and_then(|e| {
        if input.shiny {
            e.screenshot_shiny.clone()
        } else {
            e.screenshot.clone()
        }
    });

    let cleared =
        CollectionRepo::clear_screenshot_slot(&state.pool, &target, pokemon_id, input.shiny).await?;
    if !cleared {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Screenshot",
            id: pokemon_id,
        }));
    }

    if let Some(blob_name) = url.as_deref().and_then(|u| state.blob.blob_name_from_url(u)) {
        if let Err(e) = state.blob.delete(&blob_name).await {
            tracing::warn!(blob = %blob_name, error = %e, "Moderated blob removal failed");
        }
    }

    audit(&state, &admin.user_id, "deleteScreenshot", Some(&target), Some(pokemon_id)).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Media deleted successfully",
        "userId": target,
        "pokemonId": pokemon_id,
    })))
}

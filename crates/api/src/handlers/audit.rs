//! Handlers for the admin audit-log surface.

use axum::extract::State;
use axum::Json;
use dexvault_db::models::audit::{AuditLog, CreateAuditLog};
use dexvault_db::repositories::AuditLogRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Response body for `GET /admin/audit-logs`.
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<AuditLog>,
}

/// Request body for `POST /admin/audit-logs`.
#[derive(Debug, Deserialize)]
pub struct AddLogRequest {
    pub log: CreateAuditLog,
}

/// GET /admin/audit-logs
///
/// The 100 most recent audit entries, newest first.
pub async fn get_logs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<LogsResponse>> {
    let logs = AuditLogRepo::recent(&state.pool).await?;
    Ok(Json(LogsResponse { logs }))
}

/// POST /admin/audit-logs
///
/// Append an audit entry. The actor is taken from the authenticated
/// admin, not the request body.
pub async fn add_log(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AddLogRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let entry = CreateAuditLog {
        actor_user_id: admin.user_id,
        ..input.log
    };
    AuditLogRepo::insert(&state.pool, &entry).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

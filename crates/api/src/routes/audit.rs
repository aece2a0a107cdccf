//! Route definitions for the admin audit-log resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Audit routes mounted at `/admin/audit-logs`.
///
/// ```text
/// GET  /audit-logs -> get_logs
/// POST /audit-logs -> add_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/audit-logs", get(audit::get_logs).post(audit::add_log))
}

//! Health check endpoint.
//!
//! Probes the database and the blob store, each under the configured
//! outbound timeout so a hung dependency degrades the check instead of
//! hanging it.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// One dependency check outcome.
#[derive(Serialize)]
pub struct CheckResult {
    pub ok: bool,
    pub message: String,
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckResult,
    pub blob: CheckResult,
}

/// GET /health -- returns service and dependency health.
///
/// 200 when every check passes, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let timeout = Duration::from_secs(state.config.outbound_timeout_secs);

    let database = match tokio::time::timeout(timeout, dexvault_db::health_check(&state.pool)).await
    {
        Ok(Ok(())) => CheckResult { ok: true, message: "Connected".into() },
        Ok(Err(e)) => CheckResult { ok: false, message: e.to_string() },
        Err(_) => CheckResult { ok: false, message: "Timed out".into() },
    };

    // Probing an arbitrary blob name exercises connectivity; NotFound is
    // a healthy answer, anything else is not.
    let blob = match tokio::time::timeout(
        timeout,
        state.blob.signed_get_url("health/probe.png"),
    )
    .await
    {
        Ok(Ok(_)) | Ok(Err(dexvault_cloud::BlobError::NotFound(_))) => {
            CheckResult { ok: true, message: "Container is ready".into() }
        }
        Ok(Err(e)) => CheckResult { ok: false, message: e.to_string() },
        Err(_) => CheckResult { ok: false, message: "Timed out".into() },
    };

    let healthy = database.ok && blob.ok;
    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { database, blob },
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

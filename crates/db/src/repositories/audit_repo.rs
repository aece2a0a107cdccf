//! Repository for the `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, CreateAuditLog};

/// Maximum entries returned by the recent-logs query.
const RECENT_LIMIT: i64 = 100;

const COLUMNS: &str =
    "id, timestamp, actor_user_id, action_type, target_user_id, pokemon_id, details_json, created_at";

/// Provides insert and query operations for the audit trail.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one audit entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (actor_user_id, action_type, target_user_id, pokemon_id, details_json)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(&entry.actor_user_id)
            .bind(&entry.action_type)
            .bind(&entry.target_user_id)
            .bind(entry.pokemon_id)
            .bind(&entry.details_json)
            .fetch_one(pool)
            .await
    }

    /// The most recent entries, newest first.
    pub async fn recent(pool: &PgPool) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs ORDER BY timestamp DESC, id DESC LIMIT {RECENT_LIMIT}"
        );
        sqlx::query_as::<_, AuditLog>(&query).fetch_all(pool).await
    }
}

//! Repository for the `collection_entries` table.
//!
//! Encodes the store's central asymmetry: a write with `caught = false`
//! deletes the row (or is a no-op when no row exists); a write with
//! `caught = true` upserts. The table therefore never holds a
//! `caught = false` row, and "list everything including uncaught" is
//! answered by joining against the catalog, not by this table alone.

use dexvault_core::types::DexId;
use sqlx::PgPool;

use crate::models::collection_entry::{
    CollectionEntry, MediaRecord, UpsertCaught, WriteAction,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, pokemon_id, caught, shiny, notes, screenshot, \
                        screenshot_shiny, share_id, created_at, updated_at";

/// Provides query and mutation operations for collection entries.
pub struct CollectionRepo;

impl CollectionRepo {
    /// List all entries belonging to a user, ascending dex order.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<CollectionEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM collection_entries WHERE user_id = $1 ORDER BY pokemon_id");
        sqlx::query_as::<_, CollectionEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch a single entry, if the user has one for this species.
    pub async fn get_one(
        pool: &PgPool,
        user_id: &str,
        pokemon_id: DexId,
    ) -> Result<Option<CollectionEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM collection_entries WHERE user_id = $1 AND pokemon_id = $2");
        sqlx::query_as::<_, CollectionEntry>(&query)
            .bind(user_id)
            .bind(pokemon_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update the entry for a species, setting `caught = true`
    /// unconditionally. Returns the action taken.
    ///
    /// On update, only the fields present in `input` are replaced; the
    /// screenshot slots are preserved unless a new reference is supplied.
    pub async fn upsert_caught(
        pool: &PgPool,
        user_id: &str,
        pokemon_id: DexId,
        input: &UpsertCaught,
    ) -> Result<WriteAction, sqlx::Error> {
        let existing = Self::get_one(pool, user_id, pokemon_id).await?;

        let query = format!(
            "INSERT INTO collection_entries (user_id, pokemon_id, caught, shiny, notes, screenshot)
             VALUES ($1, $2, TRUE, COALESCE($3, FALSE), COALESCE($4, ''), $5)
             ON CONFLICT ON CONSTRAINT uq_collection_user_species DO UPDATE SET
                caught = TRUE,
                shiny = COALESCE($3, collection_entries.shiny),
                notes = COALESCE($4, collection_entries.notes),
                screenshot = COALESCE($5, collection_entries.screenshot),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CollectionEntry>(&query)
            .bind(user_id)
            .bind(pokemon_id)
            .bind(input.shiny)
            .bind(&input.notes)
            .bind(&input.screenshot)
            .fetch_one(pool)
            .await?;

        Ok(if existing.is_some() {
            WriteAction::Updated
        } else {
            WriteAction::Caught
        })
    }

    /// Delete the entry for a species. Idempotent: absence is not an
    /// error. Returns `true` if a row was deleted.
    pub async fn remove_caught(
        pool: &PgPool,
        user_id: &str,
        pokemon_id: DexId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM collection_entries WHERE user_id = $1 AND pokemon_id = $2")
                .bind(user_id)
                .bind(pokemon_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a collection write per the asymmetric store policy:
    ///
    /// - `caught != false` → upsert (`"caught"` or `"updated"`).
    /// - `caught == false` on an existing row → delete (`"uncaught"`).
    /// - `caught == false` with no row → no-op (`"none"`); a
    ///   "not caught" row is never created.
    pub async fn apply_write(
        pool: &PgPool,
        user_id: &str,
        pokemon_id: DexId,
        caught: Option<bool>,
        input: &UpsertCaught,
    ) -> Result<WriteAction, sqlx::Error> {
        if caught == Some(false) {
            return Ok(if Self::remove_caught(pool, user_id, pokemon_id).await? {
                WriteAction::Uncaught
            } else {
                WriteAction::None
            });
        }
        Self::upsert_caught(pool, user_id, pokemon_id, input).await
    }

    // -- Sharing ------------------------------------------------------------

    /// The user's share token, if sharing is enabled.
    pub async fn find_share_id(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT share_id FROM collection_entries
             WHERE user_id = $1 AND share_id IS NOT NULL
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map(Option::flatten)
    }

    /// Stamp a share token onto every entry the user owns.
    pub async fn set_share_id(
        pool: &PgPool,
        user_id: &str,
        share_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE collection_entries SET share_id = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(share_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear the share token from all of the user's entries.
    pub async fn clear_share_id(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE collection_entries SET share_id = NULL, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// All entries published under a share token, ascending dex order.
    pub async fn list_by_share_id(
        pool: &PgPool,
        share_id: &str,
    ) -> Result<Vec<CollectionEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM collection_entries WHERE share_id = $1 ORDER BY pokemon_id");
        sqlx::query_as::<_, CollectionEntry>(&query)
            .bind(share_id)
            .fetch_all(pool)
            .await
    }

    // -- Media references ---------------------------------------------------

    /// Record a screenshot reference in the regular or shiny slot.
    ///
    /// Requires an existing row (the species must already be caught);
    /// returns `false` when no row was updated.
    pub async fn set_screenshot(
        pool: &PgPool,
        user_id: &str,
        pokemon_id: DexId,
        url: &str,
        shiny_slot: bool,
    ) -> Result<bool, sqlx::Error> {
        let column = if shiny_slot { "screenshot_shiny" } else { "screenshot" };
        let query = format!(
            "UPDATE collection_entries SET {column} = $3, updated_at = NOW()
             WHERE user_id = $1 AND pokemon_id = $2"
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(pokemon_id)
            .bind(url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear whichever slot currently references `url` on the user's
    /// entries. Returns `true` if any slot was cleared.
    pub async fn clear_screenshot_by_url(
        pool: &PgPool,
        user_id: &str,
        url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE collection_entries SET
                screenshot = CASE WHEN screenshot = $2 THEN NULL ELSE screenshot END,
                screenshot_shiny = CASE WHEN screenshot_shiny = $2 THEN NULL ELSE screenshot_shiny END,
                updated_at = NOW()
             WHERE user_id = $1 AND (screenshot = $2 OR screenshot_shiny = $2)",
        )
        .bind(user_id)
        .bind(url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear a screenshot slot for any user (admin moderation path).
    /// Returns `true` if a reference was removed.
    pub async fn clear_screenshot_slot(
        pool: &PgPool,
        user_id: &str,
        pokemon_id: DexId,
        shiny_slot: bool,
    ) -> Result<bool, sqlx::Error> {
        let column = if shiny_slot { "screenshot_shiny" } else { "screenshot" };
        let query = format!(
            "UPDATE collection_entries SET {column} = NULL, updated_at = NOW()
             WHERE user_id = $1 AND pokemon_id = $2 AND {column} IS NOT NULL"
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(pokemon_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every stored screenshot reference, newest first (admin moderation).
    pub async fn list_media(pool: &PgPool) -> Result<Vec<MediaRecord>, sqlx::Error> {
        sqlx::query_as::<_, MediaRecord>(
            "SELECT user_id, pokemon_id, screenshot AS url, FALSE AS shiny,
                    updated_at AS last_modified
             FROM collection_entries WHERE screenshot IS NOT NULL
             UNION ALL
             SELECT user_id, pokemon_id, screenshot_shiny AS url, TRUE AS shiny,
                    updated_at AS last_modified
             FROM collection_entries WHERE screenshot_shiny IS NOT NULL
             ORDER BY last_modified DESC",
        )
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `catalog_species` cache table.

use dexvault_core::catalog::SpeciesEntry;
use dexvault_core::types::DexId;
use sqlx::PgPool;

use crate::models::catalog::CatalogSpecies;

/// Upper bound on catalog rows fetched for search candidate building.
const MAX_CATALOG_ROWS: i64 = 300;

const COLUMNS: &str = "pokemon_id, name, types, sprite, sprite_shiny, region, created_at";

/// Provides query and seed operations for the species catalog cache.
pub struct CatalogRepo;

impl CatalogRepo {
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM catalog_species")
            .fetch_one(pool)
            .await
    }

    /// All cached species up to the candidate cap, ascending dex order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CatalogSpecies>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM catalog_species ORDER BY pokemon_id LIMIT {MAX_CATALOG_ROWS}");
        sqlx::query_as::<_, CatalogSpecies>(&query).fetch_all(pool).await
    }

    /// All cached species of one region, ascending dex order.
    pub async fn list_by_region(
        pool: &PgPool,
        region: &str,
    ) -> Result<Vec<CatalogSpecies>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM catalog_species WHERE region = $1 ORDER BY pokemon_id");
        sqlx::query_as::<_, CatalogSpecies>(&query)
            .bind(region)
            .fetch_all(pool)
            .await
    }

    pub async fn get(pool: &PgPool, pokemon_id: DexId) -> Result<Option<CatalogSpecies>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_species WHERE pokemon_id = $1");
        sqlx::query_as::<_, CatalogSpecies>(&query)
            .bind(pokemon_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or refresh a batch of species entries.
    pub async fn upsert_many(pool: &PgPool, entries: &[SpeciesEntry]) -> Result<(), sqlx::Error> {
        for entry in entries {
            sqlx::query(
                "INSERT INTO catalog_species (pokemon_id, name, types, sprite, sprite_shiny, region)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (pokemon_id) DO UPDATE SET
                    name = EXCLUDED.name,
                    types = EXCLUDED.types,
                    sprite = EXCLUDED.sprite,
                    sprite_shiny = EXCLUDED.sprite_shiny,
                    region = EXCLUDED.region",
            )
            .bind(entry.id)
            .bind(&entry.name)
            .bind(serde_json::json!(entry.types))
            .bind(&entry.sprite)
            .bind(&entry.sprite_shiny)
            .bind(&entry.region)
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Seed the cache from the static region table if it is empty.
    /// Idempotent; called once at startup.
    pub async fn ensure_seeded(pool: &PgPool) -> Result<u64, sqlx::Error> {
        if Self::count(pool).await? > 0 {
            return Ok(0);
        }
        let universe = dexvault_core::catalog::full_universe();
        Self::upsert_many(pool, &universe).await?;
        tracing::info!(species = universe.len(), "Seeded catalog cache");
        Ok(universe.len() as u64)
    }
}

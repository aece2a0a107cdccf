//! Catalog cache model.

use dexvault_core::types::{DexId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One species row from the `catalog_species` cache.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogSpecies {
    pub pokemon_id: DexId,
    pub name: String,
    /// JSON array of type names.
    pub types: serde_json::Value,
    pub sprite: String,
    pub sprite_shiny: String,
    pub region: Option<String>,
    pub created_at: Timestamp,
}

impl CatalogSpecies {
    /// The species' type names as strings.
    pub fn type_names(&self) -> Vec<String> {
        self.types
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Wire projection of one catalog species.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub id: DexId,
    pub name: String,
    pub sprite: String,
    #[serde(rename = "spriteShiny")]
    pub sprite_shiny: String,
    pub region: Option<String>,
}

impl From<&CatalogSpecies> for CatalogItem {
    fn from(s: &CatalogSpecies) -> Self {
        Self {
            id: s.pokemon_id,
            name: s.name.clone(),
            sprite: s.sprite.clone(),
            sprite_shiny: s.sprite_shiny.clone(),
            region: s.region.clone(),
        }
    }
}

//! Collection entry model and DTOs.

use dexvault_core::types::{DexId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full collection row from the `collection_entries` table.
///
/// A stored row always has `caught = true`; an uncaught species simply has
/// no row. `share_id` is denormalized: once sharing is enabled every row
/// belonging to the user carries the same token.
#[derive(Debug, Clone, FromRow)]
pub struct CollectionEntry {
    pub id: i64,
    pub user_id: String,
    pub pokemon_id: DexId,
    pub caught: bool,
    pub shiny: bool,
    pub notes: String,
    pub screenshot: Option<String>,
    pub screenshot_shiny: Option<String>,
    pub share_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wire projection of one entry for the owner's own collection view.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionItem {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
    pub caught: bool,
    pub shiny: bool,
    pub notes: String,
    pub screenshot: Option<String>,
    #[serde(rename = "screenshotShiny")]
    pub screenshot_shiny: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl From<&CollectionEntry> for CollectionItem {
    fn from(e: &CollectionEntry) -> Self {
        Self {
            pokemon_id: e.pokemon_id,
            caught: e.caught,
            shiny: e.shiny,
            notes: e.notes.clone(),
            screenshot: e.screenshot.clone(),
            screenshot_shiny: e.screenshot_shiny.clone(),
            updated_at: e.updated_at,
        }
    }
}

/// Fields applied on a caught-upsert. `caught = true` is set
/// unconditionally by the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertCaught {
    pub shiny: Option<bool>,
    pub notes: Option<String>,
    pub screenshot: Option<String>,
}

/// The action a collection write resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    /// A new entry was created.
    Caught,
    /// An existing entry was updated in place.
    Updated,
    /// An existing entry was deleted (marked uncaught).
    Uncaught,
    /// Nothing to do (uncatching an absent entry).
    None,
}

impl WriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteAction::Caught => "caught",
            WriteAction::Updated => "updated",
            WriteAction::Uncaught => "uncaught",
            WriteAction::None => "none",
        }
    }
}

/// One screenshot reference, as listed for admin moderation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
    pub url: String,
    pub shiny: bool,
    #[serde(rename = "lastModified")]
    pub last_modified: Timestamp,
}

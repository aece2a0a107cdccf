//! Species catalog entries and sprite URL construction.
//!
//! The catalog is static reference data: it supplies the species universe
//! that the collection store's owned subset is joined against. Names fall
//! back to a `pokemon-{id}` placeholder until richer metadata is cached.

use serde::{Deserialize, Serialize};

use crate::regions::{region, region_for_dex};
use crate::types::DexId;

/// Base URL of the public sprite CDN.
const SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// One species in the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesEntry {
    pub id: DexId,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub sprite: String,
    #[serde(rename = "spriteShiny")]
    pub sprite_shiny: String,
    pub region: Option<String>,
}

/// Placeholder species name used until real metadata is available.
pub fn placeholder_name(id: DexId) -> String {
    format!("pokemon-{id}")
}

/// Default (non-shiny) sprite URL for a dex number.
pub fn sprite_url(id: DexId) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

/// Shiny sprite URL for a dex number.
pub fn sprite_shiny_url(id: DexId) -> String {
    format!("{SPRITE_BASE}/shiny/{id}.png")
}

/// Build the species universe for one region, sorted by dex number.
///
/// Returns `None` for an unknown region key.
pub fn species_for_region(region_key: &str) -> Option<Vec<SpeciesEntry>> {
    let span = region(region_key)?;
    let entries = (0..span.limit)
        .map(|i| {
            let id = span.offset + i;
            SpeciesEntry {
                id,
                name: placeholder_name(id),
                types: Vec::new(),
                sprite: sprite_url(id),
                sprite_shiny: sprite_shiny_url(id),
                region: Some(span.key.to_string()),
            }
        })
        .collect();
    Some(entries)
}

/// Build the full species universe across every region.
pub fn full_universe() -> Vec<SpeciesEntry> {
    crate::regions::REGIONS
        .iter()
        .flat_map(|r| species_for_region(r.key).unwrap_or_default())
        .collect()
}

/// Enrich a bare dex number into a catalog entry with inferred region.
pub fn species_fallback(id: DexId) -> SpeciesEntry {
    SpeciesEntry {
        id,
        name: placeholder_name(id),
        types: Vec::new(),
        sprite: sprite_url(id),
        sprite_shiny: sprite_shiny_url(id),
        region: region_for_dex(id).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_universe_is_sorted_and_complete() {
        let kanto = species_for_region("kanto").unwrap();
        assert_eq!(kanto.len(), 151);
        assert_eq!(kanto.first().unwrap().id, 1);
        assert_eq!(kanto.last().unwrap().id, 151);
        assert!(kanto.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn unknown_region_yields_none() {
        assert!(species_for_region("orre").is_none());
    }

    #[test]
    fn sprite_urls_embed_dex_number() {
        assert!(sprite_url(25).ends_with("/pokemon/25.png"));
        assert!(sprite_shiny_url(25).ends_with("/pokemon/shiny/25.png"));
    }

    #[test]
    fn fallback_entry_infers_region() {
        let entry = species_fallback(25);
        assert_eq!(entry.name, "pokemon-25");
        assert_eq!(entry.region.as_deref(), Some("kanto"));

        let out_of_range = species_fallback(2000);
        assert_eq!(out_of_range.region, None);
    }

    #[test]
    fn full_universe_spans_all_regions() {
        let all = full_universe();
        assert_eq!(all.len(), 898);
        assert_eq!(all.first().unwrap().id, 1);
        assert_eq!(all.last().unwrap().id, 898);
    }
}

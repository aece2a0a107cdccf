//! Managed search-index client (delegated search path).
//!
//! The index holds species metadata only -- per-user caught/shiny/notes
//! state is overlaid by the caller after querying. Queries are
//! "contains" wildcard full-text searches with OData-style filters.

use std::time::Duration;

use dexvault_core::types::DexId;
use serde::Deserialize;

use crate::directory::escape_filter_value;

/// HTTP request timeout for index queries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

/// Stable query API version.
const API_VERSION: &str = "2023-11-01";

/// Index configuration, typically loaded from the environment.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
}

impl SearchIndexConfig {
    /// Load from `SEARCH_ENDPOINT` / `SEARCH_KEY` / `SEARCH_INDEX`;
    /// `None` when endpoint or key is unset (delegation disabled).
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("SEARCH_ENDPOINT").ok()?;
        let api_key = std::env::var("SEARCH_KEY").ok()?;
        if endpoint.is_empty() || api_key.is_empty() {
            return None;
        }
        let index_name =
            std::env::var("SEARCH_INDEX").unwrap_or_else(|_| "userdex".to_string());
        Some(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            index_name,
        })
    }
}

/// One document returned by the index.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchIndexDoc {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(rename = "spriteShiny", default)]
    pub sprite_shiny: Option<String>,
    #[serde(rename = "@search.score", default)]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    value: Vec<SearchIndexDoc>,
}

/// Build the index filter expression for the hard predicates.
///
/// Only species-level predicates translate (region); caught/shiny are
/// per-user state the index does not hold, so the caller re-applies them
/// locally after the overlay.
pub fn build_region_filter(region: Option<&str>) -> Option<String> {
    region.map(|r| format!("region eq '{}'", escape_filter_value(r)))
}

/// Error type for index queries.
#[derive(Debug, thiserror::Error)]
pub enum SearchIndexError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search index returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// reqwest-backed client for the managed search index.
pub struct SearchIndexClient {
    client: reqwest::Client,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    pub fn new(config: SearchIndexConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Run a full-text query against the index.
    ///
    /// A non-empty query is wrapped as `*q*` with full query syntax for
    /// partial-name matching; an empty query matches everything.
    pub async fn query(
        &self,
        query: &str,
        filter: Option<&str>,
        top: usize,
    ) -> Result<Vec<SearchIndexDoc>, SearchIndexError> {
        let url = format!(
            "{}/indexes/{}/docs/search?api-version={API_VERSION}",
            self.config.endpoint, self.config.index_name
        );

        let (search, query_type) = if query.is_empty() || query == "*" {
            ("*".to_string(), "simple")
        } else {
            (format!("*{query}*"), "full")
        };

        let body = serde_json::json!({
            "search": search,
            "filter": filter,
            "top": top,
            "queryType": query_type,
            "searchMode": "all",
            "select": "pokemonId,name,types,region,sprite,spriteShiny",
        });

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::HttpStatus { status: status.as_u16(), body });
        }

        let page: SearchPage = response.json().await?;
        Ok(page.value)
    }
}

//! Keyword scoring and ranking for collection search.
//!
//! The local search path joins the species catalog with the caller's
//! collection entries into [`Candidate`]s (unowned species appear with
//! `caught = false`, synthesized, never persisted), applies the hard
//! filter predicates, scores each candidate's text blob against the
//! query terms, and truncates to `top_k`.

use serde::Deserialize;

use crate::types::DexId;

/// Default number of results returned when `topK` is absent.
pub const DEFAULT_TOP_K: usize = 20;

/// Hard cap on the number of results.
pub const MAX_TOP_K: usize = 300;

/// Weight for a query term matching the start of the species name.
const WEIGHT_NAME_PREFIX: u32 = 10;

/// Weight for a query term contained in the species name.
const WEIGHT_NAME_SUBSTRING: u32 = 5;

/// Weight for a query term contained anywhere in the text blob.
const WEIGHT_ANY_FIELD: u32 = 1;

/// Hard include/exclude predicates. Each is exact; no fuzziness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub region: Option<String>,
    pub caught: Option<bool>,
    pub shiny: Option<bool>,
    pub has_screenshot: Option<bool>,
}

/// One searchable item: catalog species plus per-user overlay.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub pokemon_id: DexId,
    pub name: String,
    pub types: Vec<String>,
    pub region: Option<String>,
    pub caught: bool,
    pub shiny: bool,
    pub notes: String,
    pub screenshot: Option<String>,
}

impl Candidate {
    /// Whether this candidate passes every configured predicate.
    pub fn matches(&self, filters: &SearchFilters) -> bool {
        if let Some(region) = &filters.region {
            match &self.region {
                Some(r) if r.eq_ignore_ascii_case(region) => {}
                _ => return false,
            }
        }
        if let Some(caught) = filters.caught {
            if self.caught != caught {
                return false;
            }
        }
        if let Some(shiny) = filters.shiny {
            if self.shiny != shiny {
                return false;
            }
        }
        if let Some(has_screenshot) = filters.has_screenshot {
            if self.screenshot.is_some() != has_screenshot {
                return false;
            }
        }
        true
    }

    /// The text blob scored against query terms.
    pub fn blob(&self) -> String {
        let mut parts = vec![format!("Name: {}", self.name)];
        if !self.types.is_empty() {
            parts.push(format!("Types: {}", self.types.join(", ")));
        }
        if !self.notes.is_empty() {
            parts.push(format!("Notes: {}", self.notes));
        }
        parts.push(if self.caught {
            "Status: caught".to_string()
        } else {
            "Status: not caught".to_string()
        });
        if self.shiny {
            parts.push("Shiny".to_string());
        }
        if let Some(region) = &self.region {
            parts.push(format!("Region: {region}"));
        }
        parts.join(". ")
    }
}

/// Split a query into lowercase whitespace-separated terms.
fn terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Count of query terms occurring as substrings of `text`
/// (case-insensitive).
pub fn keyword_score(text: &str, query: &str) -> u32 {
    let haystack = text.to_lowercase();
    terms(query)
        .iter()
        .filter(|t| haystack.contains(t.as_str()))
        .count() as u32
}

/// Weighted per-term score: name-prefix matches score highest, then
/// name substrings, then any-field substrings.
pub fn weighted_score(name: &str, blob: &str, query: &str) -> u32 {
    let name = name.to_lowercase();
    let haystack = blob.to_lowercase();
    terms(query)
        .iter()
        .map(|t| {
            if name.starts_with(t.as_str()) {
                WEIGHT_NAME_PREFIX
            } else if name.contains(t.as_str()) {
                WEIGHT_NAME_SUBSTRING
            } else if haystack.contains(t.as_str()) {
                WEIGHT_ANY_FIELD
            } else {
                0
            }
        })
        .sum()
}

/// Clamp a requested result count to `1..=MAX_TOP_K`, default 20.
pub fn clamp_top_k(top_k: Option<usize>) -> usize {
    top_k.unwrap_or(DEFAULT_TOP_K).clamp(1, MAX_TOP_K)
}

/// Rank candidates against a query.
///
/// - An empty/whitespace query returns every candidate (score 0) in
///   ascending dex order.
/// - Otherwise zero-score candidates are dropped and the rest are sorted
///   by descending score; ties break on ascending dex number so results
///   are deterministic.
pub fn rank(candidates: Vec<Candidate>, query: &str, top_k: usize) -> Vec<(Candidate, u32)> {
    let mut scored: Vec<(Candidate, u32)> = if terms(query).is_empty() {
        candidates.into_iter().map(|c| (c, 0)).collect()
    } else {
        candidates
            .into_iter()
            .map(|c| {
                let score = weighted_score(&c.name, &c.blob(), query);
                (c, score)
            })
            .filter(|(_, score)| *score > 0)
            .collect()
    };

    scored.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.pokemon_id.cmp(&b.0.pokemon_id))
    });
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: DexId, name: &str) -> Candidate {
        Candidate {
            pokemon_id: id,
            name: name.to_string(),
            types: vec!["electric".to_string()],
            region: Some("kanto".to_string()),
            caught: false,
            shiny: false,
            notes: String::new(),
            screenshot: None,
        }
    }

    fn caught(id: DexId, name: &str, notes: &str) -> Candidate {
        Candidate {
            caught: true,
            notes: notes.to_string(),
            ..candidate(id, name)
        }
    }

    // -- keyword_score -------------------------------------------------------

    #[test]
    fn keyword_score_counts_matching_terms() {
        assert_eq!(keyword_score("Name: pikachu. Region: kanto", "pikachu"), 1);
        assert_eq!(keyword_score("Name: pikachu. Region: kanto", "pikachu kanto"), 2);
        assert_eq!(keyword_score("Name: pikachu. Region: kanto", "mewtwo"), 0);
    }

    #[test]
    fn keyword_score_is_case_insensitive() {
        assert_eq!(keyword_score("Name: Pikachu", "PIKA"), 1);
    }

    #[test]
    fn keyword_score_empty_query_is_zero() {
        assert_eq!(keyword_score("anything", ""), 0);
        assert_eq!(keyword_score("anything", "   "), 0);
    }

    // -- weighted_score ------------------------------------------------------

    #[test]
    fn name_prefix_outranks_name_substring() {
        let c = candidate(25, "pikachu");
        let blob = c.blob();
        assert_eq!(weighted_score("pikachu", &blob, "pika"), 10);
        assert_eq!(weighted_score("pikachu", &blob, "kachu"), 5);
    }

    #[test]
    fn field_match_scores_one_per_term() {
        let c = caught(25, "pikachu", "Victory Road");
        let blob = c.blob();
        assert_eq!(weighted_score(&c.name, &blob, "victory"), 1);
        assert_eq!(weighted_score(&c.name, &blob, "victory road"), 2);
    }

    #[test]
    fn unmatched_terms_score_zero() {
        let c = candidate(25, "pikachu");
        assert_eq!(weighted_score(&c.name, &c.blob(), "zubat"), 0);
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn filters_are_hard_predicates() {
        let c = caught(25, "pikachu", "");
        assert!(c.matches(&SearchFilters { caught: Some(true), ..Default::default() }));
        assert!(!c.matches(&SearchFilters { caught: Some(false), ..Default::default() }));
        assert!(!c.matches(&SearchFilters { shiny: Some(true), ..Default::default() }));
        assert!(c.matches(&SearchFilters {
            region: Some("KANTO".to_string()),
            ..Default::default()
        }));
        assert!(!c.matches(&SearchFilters {
            region: Some("johto".to_string()),
            ..Default::default()
        }));
    }

    #[test]
    fn screenshot_filter_checks_presence() {
        let mut c = caught(25, "pikachu", "");
        let wants = SearchFilters { has_screenshot: Some(true), ..Default::default() };
        assert!(!c.matches(&wants));
        c.screenshot = Some("https://blob/x.png".to_string());
        assert!(c.matches(&wants));
    }

    // -- rank ----------------------------------------------------------------

    #[test]
    fn empty_query_returns_all_candidates() {
        let ranked = rank(vec![candidate(2, "b"), candidate(1, "a")], "", 10);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|(_, s)| *s == 0));
        // ascending dex order on all-zero scores
        assert_eq!(ranked[0].0.pokemon_id, 1);
    }

    #[test]
    fn zero_score_candidates_are_dropped() {
        let ranked = rank(vec![candidate(25, "pikachu"), candidate(41, "zubat")], "pika", 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0.pokemon_id, 25);
    }

    #[test]
    fn query_matching_nothing_yields_empty() {
        let ranked = rank(vec![candidate(25, "pikachu")], "charizard", 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn ties_break_on_ascending_dex_number() {
        let ranked = rank(
            vec![candidate(26, "raichu"), candidate(25, "pikachu")],
            "chu",
            10,
        );
        assert_eq!(ranked[0].0.pokemon_id, 25);
        assert_eq!(ranked[1].0.pokemon_id, 26);
        assert_eq!(ranked[0].1, ranked[1].1);
    }

    #[test]
    fn results_truncate_to_top_k() {
        let candidates = (1..=30).map(|i| candidate(i, "pikachu")).collect();
        let ranked = rank(candidates, "pika", 5);
        assert_eq!(ranked.len(), 5);
    }

    // -- clamp_top_k ---------------------------------------------------------

    #[test]
    fn clamp_top_k_defaults_and_caps() {
        assert_eq!(clamp_top_k(None), 20);
        assert_eq!(clamp_top_k(Some(0)), 1);
        assert_eq!(clamp_top_k(Some(50)), 50);
        assert_eq!(clamp_top_k(Some(100_000)), 300);
    }
}

//! Local/remote reconciliation for the caught-Pokémon collection.
//!
//! The client works offline-first against a local per-species cache for
//! responsiveness; the server is the durable source of truth. On every
//! sync trigger (application start, sign-in transition, the page becoming
//! visible again, and a fixed-interval poll) the embedding client fetches
//! the full server-side entry list and applies [`merge_remote`]:
//! server entries overwrite matching local keys, local-only keys survive.
//!
//! The merge is a last-write-wins overlay with no conflict detection; two
//! devices racing at the server resolve by arrival order. That is an
//! accepted property of a single-user tool, not something to repair here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DexId, Timestamp};

/// One species in the client-side cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub caught: bool,
    #[serde(default)]
    pub shiny: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    /// When this entry last changed, as far as the client knows.
    pub timestamp: Timestamp,
}

/// A server-side entry as returned by the collection API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    #[serde(rename = "pokemonId")]
    pub pokemon_id: DexId,
    pub caught: bool,
    #[serde(default)]
    pub shiny: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<Timestamp>,
}

/// The client-side cache: an owner identity plus a per-species map.
///
/// The map is never authoritative; it is always reconcilable from server
/// state via [`merge_remote`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalCache {
    /// The principal the cached entries belong to, if any.
    pub owner: Option<String>,
    pub entries: BTreeMap<DexId, CachedEntry>,
}

impl LocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce the identity-change rule: whenever the authenticated
    /// principal differs from the cache owner (login, logout, or user
    /// switch), the cache is unconditionally cleared *before* the next
    /// merge. Local state must never leak across identities.
    ///
    /// Returns `true` when the cache was cleared.
    pub fn sync_identity(&mut self, principal: Option<&str>) -> bool {
        if self.owner.as_deref() == principal {
            return false;
        }
        self.entries.clear();
        self.owner = principal.map(str::to_string);
        true
    }

    /// Apply a full server snapshot, replacing the map with the merge
    /// result. `now` stamps server entries that carry no `updatedAt`.
    pub fn apply_remote(&mut self, server: &[RemoteEntry], now: Timestamp) {
        self.entries = merge_remote(&self.entries, server, now);
    }
}

/// Merge a server snapshot over a local map: server wins per key,
/// local-only keys are preserved as-is.
pub fn merge_remote(
    local: &BTreeMap<DexId, CachedEntry>,
    server: &[RemoteEntry],
    now: Timestamp,
) -> BTreeMap<DexId, CachedEntry> {
    let mut merged = local.clone();
    for entry in server {
        merged.insert(
            entry.pokemon_id,
            CachedEntry {
                caught: entry.caught,
                shiny: entry.shiny,
                notes: entry.notes.clone(),
                screenshot: entry.screenshot.clone(),
                timestamp: entry.updated_at.unwrap_or(now),
            },
        );
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn cached(notes: &str, at: i64) -> CachedEntry {
        CachedEntry {
            caught: true,
            shiny: false,
            notes: notes.to_string(),
            screenshot: None,
            timestamp: ts(at),
        }
    }

    fn remote(id: DexId, notes: &str, updated: Option<i64>) -> RemoteEntry {
        RemoteEntry {
            pokemon_id: id,
            caught: true,
            shiny: false,
            notes: notes.to_string(),
            screenshot: None,
            updated_at: updated.map(ts),
        }
    }

    #[test]
    fn server_overwrites_matching_keys_and_local_only_keys_survive() {
        let mut local = BTreeMap::new();
        local.insert(1, cached("a", 100));
        local.insert(2, cached("b", 100));

        let merged = merge_remote(&local, &[remote(1, "a-updated", Some(200))], ts(300));

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&1].notes, "a-updated");
        assert_eq!(merged[&1].timestamp, ts(200));
        assert_eq!(merged[&2].notes, "b");
    }

    #[test]
    fn server_entry_without_updated_at_is_stamped_now() {
        let merged = merge_remote(&BTreeMap::new(), &[remote(7, "x", None)], ts(555));
        assert_eq!(merged[&7].timestamp, ts(555));
    }

    #[test]
    fn empty_server_snapshot_leaves_local_untouched() {
        let mut local = BTreeMap::new();
        local.insert(3, cached("offline edit", 42));

        let merged = merge_remote(&local, &[], ts(99));
        assert_eq!(merged, local);
    }

    #[test]
    fn merge_carries_all_server_fields() {
        let server = [RemoteEntry {
            pokemon_id: 25,
            caught: true,
            shiny: true,
            notes: "Victory Road".to_string(),
            screenshot: Some("https://blob/pika.png".to_string()),
            updated_at: Some(ts(10)),
        }];
        let merged = merge_remote(&BTreeMap::new(), &server, ts(20));

        let e = &merged[&25];
        assert!(e.caught && e.shiny);
        assert_eq!(e.notes, "Victory Road");
        assert_eq!(e.screenshot.as_deref(), Some("https://blob/pika.png"));
    }

    #[test]
    fn identity_switch_clears_cache_before_merge() {
        let mut cache = LocalCache::new();
        cache.sync_identity(Some("u1"));
        cache.apply_remote(&[remote(1, "u1 data", Some(1))], ts(1));
        assert_eq!(cache.entries.len(), 1);

        // Switch to a different user: the cache must be empty immediately,
        // then populate only from the new user's server data.
        let cleared = cache.sync_identity(Some("u2"));
        assert!(cleared);
        assert!(cache.entries.is_empty());

        cache.apply_remote(&[remote(9, "u2 data", Some(2))], ts(2));
        assert_eq!(cache.entries.len(), 1);
        assert_eq!(cache.entries[&9].notes, "u2 data");
    }

    #[test]
    fn logout_clears_cache() {
        let mut cache = LocalCache::new();
        cache.sync_identity(Some("u1"));
        cache.apply_remote(&[remote(1, "n", None)], ts(1));

        assert!(cache.sync_identity(None));
        assert!(cache.entries.is_empty());
        assert_eq!(cache.owner, None);
    }

    #[test]
    fn same_identity_does_not_clear() {
        let mut cache = LocalCache::new();
        cache.sync_identity(Some("u1"));
        cache.apply_remote(&[remote(1, "n", None)], ts(1));

        assert!(!cache.sync_identity(Some("u1")));
        assert_eq!(cache.entries.len(), 1);
    }
}

pub mod admin;
pub mod audit;
pub mod catalog;
pub mod collection;
pub mod health;
pub mod media;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /userdex                         get, put, delete collection entries
/// /userdex/share                   enable sharing (POST)
/// /userdex/unshare                 disable sharing (POST)
/// /userdex/shared/{shareId}        public read-only snapshot (GET)
///
/// /media                           upload (POST), delete own blob (DELETE)
///
/// /search                          ranked collection search (GET)
///
/// /pokedex                         static region catalog (GET)
///
/// /admin/users                     list accounts (GET)
/// /admin/users/promote             grant admin role (POST)
/// /admin/users/demote              revoke admin role (POST)
/// /admin/users/block               disable account (POST)
/// /admin/users/unblock             enable account (POST)
/// /admin/media                     list all media (GET), moderate (DELETE)
/// /admin/audit-logs                recent entries (GET), append (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(collection::router())
        .merge(media::router())
        .merge(search::router())
        .merge(catalog::router())
        .nest("/admin", admin::router().merge(audit::router()))
}

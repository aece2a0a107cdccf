//! Route definitions for the `/pokedex` catalog resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/pokedex`.
///
/// ```text
/// GET /pokedex?region= -> get_catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/pokedex", get(catalog::get_catalog))
}

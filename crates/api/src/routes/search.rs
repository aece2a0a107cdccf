//! Route definitions for the `/search` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET /search?q=&region=&caught=&shiny=&screenshot=&topK=&ai= -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search::search))
}

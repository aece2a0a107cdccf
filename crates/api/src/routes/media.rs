//! Route definitions for the `/media` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// POST   /media    -> upload
/// DELETE /media    -> delete (ownership enforced by blob-name prefix)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/media", post(media::upload).delete(media::delete))
}

//! Route definitions for the `/userdex` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{collection, sharing};
use crate::state::AppState;

/// Routes mounted at `/userdex`.
///
/// All routes except the shared snapshot require an authenticated
/// principal (enforced by handler extractors).
///
/// ```text
/// GET    /userdex                    -> get_collection
/// PUT    /userdex                    -> put_entry
/// DELETE /userdex                    -> delete_entry
/// POST   /userdex/share              -> enable_sharing
/// POST   /userdex/unshare            -> disable_sharing
/// GET    /userdex/shared/{shareId}   -> shared_view (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/userdex",
            get(collection::get_collection)
                .put(collection::put_entry)
                .delete(collection::delete_entry),
        )
        .route("/userdex/share", post(sharing::enable_sharing))
        .route("/userdex/unshare", post(sharing::disable_sharing))
        .route("/userdex/shared/{share_id}", get(sharing::shared_view))
}

//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require directory-resolved admin access (enforced by
/// handler extractors).
///
/// ```text
/// GET    /users          -> list_users
/// POST   /users/promote  -> promote_admin
/// POST   /users/demote   -> demote_admin
/// POST   /users/block    -> block_user
/// POST   /users/unblock  -> unblock_user
/// GET    /media          -> list_media
/// DELETE /media          -> delete_screenshot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/promote", post(admin::promote_admin))
        .route("/users/demote", post(admin::demote_admin))
        .route("/users/block", post(admin::block_user))
        .route("/users/unblock", post(admin::unblock_user))
        .route(
            "/media",
            get(admin::list_media).delete(admin::delete_screenshot),
        )
}

//! Admin-only access control.
//!
//! [`RequireAdmin`] wraps [`ClientPrincipal`] and resolves the principal
//! against the identity directory. Resolution is fail-closed: an
//! unconfigured or unreachable directory means nobody is an admin.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dexvault_cloud::resolve_is_admin;
use dexvault_core::error::CoreError;
use dexvault_core::principal::Principal;

use super::auth::ClientPrincipal;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the directory-resolved admin role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(principal): RequireAdmin) -> AppResult<Json<()>> {
///     // principal is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ClientPrincipal(principal) =
            ClientPrincipal::from_request_parts(parts, state).await?;

        let Some(directory) = &state.directory else {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        };

        let resolution = resolve_is_admin(directory.as_ref(), &principal).await;
        if !resolution.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }

        tracing::debug!(user_id = %principal.user_id, "Admin access granted");
        Ok(RequireAdmin(principal))
    }
}

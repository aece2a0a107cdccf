//! Principal extractor for Axum handlers.
//!
//! Authentication itself is delegated to the hosting platform's identity
//! layer, which injects a base64-encoded JSON principal into the
//! `x-ms-client-principal` header of every authenticated request. This
//! extractor decodes that header; it never mints identities of its own.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dexvault_core::error::CoreError;
use dexvault_core::principal::Principal;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the platform-encoded principal.
pub const PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/// Authenticated principal extracted from the platform header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(ClientPrincipal(principal): ClientPrincipal) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %principal.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientPrincipal(pub Principal);

/// Decode the principal header value into a [`Principal`].
///
/// Returns `None` for undecodable or structurally invalid values; the
/// caller maps that to 401.
pub fn decode_principal(header_value: &str) -> Option<Principal> {
    let bytes = BASE64.decode(header_value.trim()).ok()?;
    let principal: Principal = serde_json::from_slice(&bytes).ok()?;
    if principal.user_id.is_empty() {
        return None;
    }
    Some(principal)
}

impl FromRequestParts<AppState> for ClientPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing client principal".into()))
            })?;

        let principal = decode_principal(header).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid client principal".into()))
        })?;

        Ok(ClientPrincipal(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        BASE64.encode(json)
    }

    #[test]
    fn decodes_valid_principal() {
        let header = encode(r#"{"userId":"u1","userDetails":"a@b.com","userRoles":["authenticated"]}"#);
        let principal = decode_principal(&header).unwrap();
        assert_eq!(principal.user_id, "u1");
        assert_eq!(principal.user_details.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn rejects_garbage_and_empty_user_id() {
        assert!(decode_principal("not-base64!!!").is_none());
        assert!(decode_principal(&encode("not json")).is_none());
        assert!(decode_principal(&encode(r#"{"userId":""}"#)).is_none());
    }
}

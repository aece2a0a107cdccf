//! Shared integration-test harness.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the
//! same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses, with an in-memory blob store and an
//! optional directory stub in place of the real collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use dexvault_api::config::ServerConfig;
use dexvault_api::router::build_app_router;
use dexvault_api::state::AppState;
use dexvault_cloud::{
    BlobStore, DirectoryApi, DirectoryError, DirectoryUser, InMemoryBlobStore,
};
use dexvault_events::{EventBus, TopicDelivery};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        outbound_timeout_secs: 4,
        blob_bucket: None,
        blob_public_base: None,
        directory_base_url: None,
        directory_token: None,
        search_index: None,
        event_topic: None,
    }
}

/// Build the full application router with the given pool, an in-memory
/// blob store, and no directory (admin access disabled).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(InMemoryBlobStore::new()), None)
}

/// Build the app with explicit blob store and directory collaborators.
pub fn build_test_app_with(
    pool: PgPool,
    blob: Arc<dyn BlobStore>,
    directory: Option<Arc<dyn DirectoryApi>>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::new()),
        topic: Arc::new(TopicDelivery::new(None)),
        blob,
        directory,
        search_index: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Directory stub
// ---------------------------------------------------------------------------

/// Canned directory used by admin tests.
///
/// `admins` maps object ids to app roles; unknown ids error like a real
/// directory's 404 does. `fail_all` simulates an unreachable directory.
#[derive(Default)]
pub struct StubDirectory {
    pub roles: HashMap<String, Vec<String>>,
    pub users: Vec<DirectoryUser>,
    pub fail_all: bool,
}

impl StubDirectory {
    /// A directory where `object_id` is an admin.
    pub fn with_admin(object_id: &str) -> Self {
        let mut roles = HashMap::new();
        roles.insert(object_id.to_string(), vec!["Admin".to_string()]);
        Self { roles, ..Default::default() }
    }

    /// A directory that errors on every call.
    pub fn unreachable() -> Self {
        Self { fail_all: true, ..Default::default() }
    }
}

#[async_trait]
impl DirectoryApi for StubDirectory {
    async fn find_user_ids_by_filter(&self, _filter: &str) -> Result<Vec<String>, DirectoryError> {
        if self.fail_all {
            return Err(DirectoryError::Malformed("unreachable".into()));
        }
        Ok(Vec::new())
    }

    async fn app_roles_for(&self, object_id: &str) -> Result<Vec<String>, DirectoryError> {
        if self.fail_all {
            return Err(DirectoryError::Malformed("unreachable".into()));
        }
        self.roles
            .get(object_id)
            .cloned()
            .ok_or_else(|| DirectoryError::Malformed("unknown object".into()))
    }

    async fn assign_role(&self, _: &str, _: &str) -> Result<(), DirectoryError> {
        if self.fail_all {
            return Err(DirectoryError::Malformed("unreachable".into()));
        }
        Ok(())
    }

    async fn set_account_enabled(&self, _: &str, _: bool) -> Result<(), DirectoryError> {
        if self.fail_all {
            return Err(DirectoryError::Malformed("unreachable".into()));
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        if self.fail_all {
            return Err(DirectoryError::Malformed("unreachable".into()));
        }
        Ok(self.users.clone())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Forge the platform principal header for a test user.
pub fn principal_header(user_id: &str) -> String {
    BASE64.encode(format!(
        r#"{{"identityProvider":"aad","userId":"{user_id}","userDetails":"{user_id}@test.com","userRoles":["authenticated"]}}"#
    ))
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET with a principal header.
pub async fn get_auth(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("x-ms-client-principal", principal_header(user_id))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Authenticated request with a JSON body.
pub async fn send_json_auth(
    app: Router,
    method: &str,
    uri: &str,
    user_id: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-ms-client-principal", principal_header(user_id))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    user_id: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json_auth(app, "PUT", uri, user_id, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    user_id: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json_auth(app, "POST", uri, user_id, body).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    user_id: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json_auth(app, "DELETE", uri, user_id, body).await
}

/// Authenticated DELETE without a body.
pub async fn delete_auth(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-ms-client-principal", principal_header(user_id))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a response status and return its JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

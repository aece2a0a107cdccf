//! Identity-directory client.
//!
//! Wraps the directory's Graph-style REST API in one typed client:
//! user lookup by OData filter, app-role assignment queries, role
//! updates, and account enable/disable. All calls share a 4-second
//! timeout so a slow directory degrades rather than hangs requests.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// HTTP request timeout for directory calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

/// Page size for user listings.
const LIST_PAGE_SIZE: usize = 100;

/// Error type for directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Directory returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Unexpected directory response: {0}")]
    Malformed(String),
}

/// One user as listed by the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "mail", default)]
    pub mail: Option<String>,
    #[serde(rename = "userPrincipalName", default)]
    pub user_principal_name: Option<String>,
    #[serde(rename = "accountEnabled", default)]
    pub account_enabled: Option<bool>,
}

/// The directory operations the admin surface depends on.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Object ids of users matching an OData `$filter` expression.
    async fn find_user_ids_by_filter(&self, filter: &str) -> Result<Vec<String>, DirectoryError>;

    /// App-role names assigned to a directory object.
    async fn app_roles_for(&self, object_id: &str) -> Result<Vec<String>, DirectoryError>;

    /// Assign an application role value to a user.
    async fn assign_role(&self, object_id: &str, role_value: &str) -> Result<(), DirectoryError>;

    /// Enable or disable a user account.
    async fn set_account_enabled(
        &self,
        object_id: &str,
        enabled: bool,
    ) -> Result<(), DirectoryError>;

    /// List directory users (first page).
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError>;
}

/// Escape a value for embedding in an OData `$filter` string literal.
pub fn escape_filter_value(value: &str) -> String {
    value.replace('\'', "''")
}

// ---------------------------------------------------------------------------
// Graph-style REST implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UserPage {
    #[serde(default)]
    value: Vec<DirectoryUser>,
}

#[derive(Debug, Deserialize)]
struct AppRoleAssignment {
    #[serde(rename = "appRoleId", default)]
    app_role_id: Option<String>,
    // Directories that resolve role names inline expose them here.
    #[serde(rename = "appRoleValue", default)]
    app_role_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssignmentPage {
    #[serde(default)]
    value: Vec<AppRoleAssignment>,
}

/// reqwest-backed client for a Graph-style directory endpoint.
pub struct GraphDirectory {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
    /// Maps well-known app-role ids to names when the directory does not
    /// resolve them inline. `(role_id, role_name)` pairs.
    role_names: Vec<(String, String)>,
}

impl GraphDirectory {
    pub fn new(base_url: String, bearer_token: String, role_names: Vec<(String, String)>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
            role_names,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<T, DirectoryError> {
        let url = format!("{}{path_and_query}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::HttpStatus { status: status.as_u16(), body });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::Malformed(e.to_string()))
    }

    async fn patch_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(), DirectoryError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::HttpStatus { status: status.as_u16(), body });
        }
        Ok(())
    }

    fn role_name_for(&self, assignment: &AppRoleAssignment) -> Option<String> {
        if let Some(value) = &assignment.app_role_value {
            return Some(value.clone());
        }
        let id = assignment.app_role_id.as_deref()?;
        self.role_names
            .iter()
            .find(|(role_id, _)| role_id == id)
            .map(|(_, name)| name.clone())
    }
}

#[async_trait]
impl DirectoryApi for GraphDirectory {
    async fn find_user_ids_by_filter(&self, filter: &str) -> Result<Vec<String>, DirectoryError> {
        let encoded = urlencode(filter);
        let page: UserPage = self
            .get_json(&format!("/users?$filter={encoded}&$select=id,userPrincipalName"))
            .await?;
        Ok(page.value.into_iter().map(|u| u.id).collect())
    }

    async fn app_roles_for(&self, object_id: &str) -> Result<Vec<String>, DirectoryError> {
        let page: AssignmentPage = self
            .get_json(&format!("/users/{}/appRoleAssignments", urlencode(object_id)))
            .await?;
        Ok(page
            .value
            .iter()
            .filter_map(|a| self.role_name_for(a))
            .collect())
    }

    async fn assign_role(&self, object_id: &str, role_value: &str) -> Result<(), DirectoryError> {
        self.patch_json(
            &format!("/users/{}", urlencode(object_id)),
            serde_json::json!({ "appRole": role_value }),
        )
        .await
    }

    async fn set_account_enabled(
        &self,
        object_id: &str,
        enabled: bool,
    ) -> Result<(), DirectoryError> {
        self.patch_json(
            &format!("/users/{}", urlencode(object_id)),
            serde_json::json!({ "accountEnabled": enabled }),
        )
        .await
    }

    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        let page: UserPage = self
            .get_json(&format!(
                "/users?$top={LIST_PAGE_SIZE}&$select=id,displayName,mail,userPrincipalName,accountEnabled"
            ))
            .await?;
        Ok(page.value)
    }
}

/// Minimal percent-encoding for filter expressions and path segments.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

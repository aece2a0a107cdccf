//! The authenticated principal supplied by the external auth layer.

use serde::{Deserialize, Serialize};

/// Read-only identity input to the system.
///
/// Produced by the hosting platform's auth layer and decoded from a
/// request header; never persisted except as the `user_id` foreign key on
/// collection entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque stable identifier of the user.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Email-like display identifier (used by directory fallback lookup).
    #[serde(rename = "userDetails", default)]
    pub user_details: Option<String>,
    /// Roles asserted by the auth layer (informational only; admin access
    /// is resolved against the directory, not this list).
    #[serde(rename = "userRoles", default)]
    pub user_roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_platform_principal_json() {
        let json = r#"{
            "identityProvider": "aad",
            "userId": "abc123",
            "userDetails": "ash@example.com",
            "userRoles": ["anonymous", "authenticated"]
        }"#;
        let p: Principal = serde_json::from_str(json).unwrap();
        assert_eq!(p.user_id, "abc123");
        assert_eq!(p.user_details.as_deref(), Some("ash@example.com"));
        assert_eq!(p.user_roles.len(), 2);
    }

    #[test]
    fn missing_optional_fields_default() {
        let p: Principal = serde_json::from_str(r#"{ "userId": "u" }"#).unwrap();
        assert_eq!(p.user_details, None);
        assert!(p.user_roles.is_empty());
    }
}

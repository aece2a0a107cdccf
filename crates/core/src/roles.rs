//! Well-known role name constants.
//!
//! `ADMIN_APP_ROLE` must match the application-role name assigned in the
//! identity directory; `ROLE_VALUE_*` are the values accepted by the
//! directory's role-assignment endpoint.

/// Directory app-role name whose membership grants admin access.
pub const ADMIN_APP_ROLE: &str = "Admin";

/// Role value used when promoting a user to admin.
pub const ROLE_VALUE_ADMIN: &str = "admin";

/// Role value used when demoting a user back to a regular account.
pub const ROLE_VALUE_USER: &str = "user";

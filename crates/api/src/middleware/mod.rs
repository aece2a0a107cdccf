//! Authentication and authorization extractors.
//!
//! - [`auth::ClientPrincipal`] -- Decodes the platform-supplied principal header.
//! - [`rbac::RequireAdmin`] -- Requires directory-resolved admin role.

pub mod auth;
pub mod rbac;

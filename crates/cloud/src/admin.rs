//! Admin/role resolution against the identity directory.
//!
//! A principal can reach the directory under two representations: its
//! stable object id, or an email-derived identity (including the
//! external/guest UPN transformation). Resolution is a single ordered
//! list of strategies tried in sequence; the first strategy producing a
//! non-empty match wins. Any failure along the way -- network error,
//! no match, malformed response -- resolves to "not admin". Admin-gated
//! actions fail closed.

use dexvault_core::principal::Principal;
use dexvault_core::roles::ADMIN_APP_ROLE;

use crate::directory::{escape_filter_value, DirectoryApi, DirectoryError};

/// Tenant domain used by the external/guest UPN transformation.
const GUEST_UPN_TENANT: &str = "dexvault.onmicrosoft.com";

/// Outcome of an admin resolution.
#[derive(Debug, Clone, Default)]
pub struct AdminResolution {
    pub is_admin: bool,
    pub roles: Vec<String>,
    /// The directory object id the principal resolved to, when any
    /// strategy matched.
    pub resolved_object_id: Option<String>,
}

/// One way of turning a principal's email into a directory lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmailStrategy {
    UserPrincipalName,
    ExternalGuestUpn,
    Mail,
    OtherMails,
    UpnPrefix,
}

/// The ordered email-fallback list. Order matters: exact identities
/// before transformations, transformations before fuzzy prefix.
const EMAIL_STRATEGIES: &[EmailStrategy] = &[
    EmailStrategy::UserPrincipalName,
    EmailStrategy::ExternalGuestUpn,
    EmailStrategy::Mail,
    EmailStrategy::OtherMails,
    EmailStrategy::UpnPrefix,
];

impl EmailStrategy {
    fn name(&self) -> &'static str {
        match self {
            EmailStrategy::UserPrincipalName => "userPrincipalName",
            EmailStrategy::ExternalGuestUpn => "externalGuestUpn",
            EmailStrategy::Mail => "mail",
            EmailStrategy::OtherMails => "otherMails",
            EmailStrategy::UpnPrefix => "upnPrefix",
        }
    }

    /// The OData filter this strategy generates for `email`, or `None`
    /// when the strategy does not apply to this input.
    fn filter(&self, email: &str) -> Option<String> {
        match self {
            EmailStrategy::UserPrincipalName => Some(format!(
                "userPrincipalName eq '{}'",
                escape_filter_value(email)
            )),
            EmailStrategy::ExternalGuestUpn => {
                let upn = guest_upn(email)?;
                Some(format!("userPrincipalName eq '{}'", escape_filter_value(&upn)))
            }
            EmailStrategy::Mail => Some(format!("mail eq '{}'", escape_filter_value(email))),
            EmailStrategy::OtherMails => Some(format!(
                "otherMails/any(x:x eq '{}')",
                escape_filter_value(email)
            )),
            EmailStrategy::UpnPrefix => {
                let local = email.split('@').next()?;
                if local.is_empty() {
                    return None;
                }
                Some(format!(
                    "startswith(userPrincipalName,'{}')",
                    escape_filter_value(local)
                ))
            }
        }
    }
}

/// The external/guest UPN a B2B-invited `local@domain` address maps to:
/// dots become underscores, `@` becomes `_`, suffixed with
/// `#EXT#@{tenant}`.
fn guest_upn(email: &str) -> Option<String> {
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    let local = local.replace('.', "_");
    let domain = domain.replace('.', "_");
    Some(format!("{local}_{domain}#EXT#@{GUEST_UPN_TENANT}"))
}

/// Resolve a principal's email to a directory object id by trying each
/// strategy in order. First non-empty match wins.
async fn resolve_object_id(
    directory: &dyn DirectoryApi,
    email: &str,
) -> Result<Option<String>, DirectoryError> {
    for strategy in EMAIL_STRATEGIES {
        let Some(filter) = strategy.filter(email) else {
            continue;
        };
        let ids = directory.find_user_ids_by_filter(&filter).await?;
        if let Some(id) = ids.into_iter().next() {
            tracing::debug!(strategy = strategy.name(), "Directory identity resolved");
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Resolve whether a principal holds the admin app role.
///
/// Tries the principal's stable id as a directory object id first, then
/// falls back through the email strategies. Every error path yields
/// `is_admin = false`; this function never fails.
pub async fn resolve_is_admin(
    directory: &dyn DirectoryApi,
    principal: &Principal,
) -> AdminResolution {
    match try_resolve(directory, principal).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(
                user_id = %principal.user_id,
                error = %e,
                "Admin resolution failed; treating as non-admin"
            );
            AdminResolution::default()
        }
    }
}

async fn try_resolve(
    directory: &dyn DirectoryApi,
    principal: &Principal,
) -> Result<AdminResolution, DirectoryError> {
    // Direct lookup: the platform user id may already be a directory
    // object id.
    if let Ok(roles) = directory.app_roles_for(&principal.user_id).await {
        if !roles.is_empty() {
            return Ok(resolution_from(principal.user_id.clone(), roles));
        }
    }

    // Email-derived fallback chain.
    let Some(email) = principal.user_details.as_deref().filter(|e| !e.is_empty()) else {
        return Ok(AdminResolution::default());
    };

    let Some(object_id) = resolve_object_id(directory, email).await? else {
        return Ok(AdminResolution::default());
    };

    let roles = directory.app_roles_for(&object_id).await?;
    Ok(resolution_from(object_id, roles))
}

fn resolution_from(object_id: String, roles: Vec<String>) -> AdminResolution {
    AdminResolution {
        is_admin: roles.iter().any(|r| r == ADMIN_APP_ROLE),
        roles,
        resolved_object_id: Some(object_id),
    }
}

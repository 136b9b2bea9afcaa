use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Check a set of granted permissions against a required one.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(granted: &[Permission], required: &Permission) -> Result<(), AuthzError> {
    if granted.iter().any(Permission::is_wildcard) {
        return Ok(());
    }

    let perms: HashSet<&str> = granted.iter().map(|p| p.as_str()).collect();
    if perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Capability predicates consumed by the forecasting core.
///
/// The core asks *what* a principal may do, never *who* it is.
pub trait RoleGate: Send + Sync {
    /// Create forecast runs.
    fn can_generate(&self, principal: &Principal) -> bool;

    /// Rename, delete and reset projects.
    fn can_manage(&self, principal: &Principal) -> bool;

    /// List, read and fetch the latest run.
    fn can_view(&self, principal: &Principal) -> bool;

    /// Record sales into the reference ledger.
    fn can_record_sales(&self, principal: &Principal) -> bool {
        self.can_manage(principal)
    }
}

impl<G: RoleGate + ?Sized> RoleGate for std::sync::Arc<G> {
    fn can_generate(&self, principal: &Principal) -> bool {
        (**self).can_generate(principal)
    }

    fn can_manage(&self, principal: &Principal) -> bool {
        (**self).can_manage(principal)
    }

    fn can_view(&self, principal: &Principal) -> bool {
        (**self).can_view(principal)
    }

    fn can_record_sales(&self, principal: &Principal) -> bool {
        (**self).can_record_sales(principal)
    }
}

/// Default role→permission policy.
///
/// "admin" is granted everything; any other authenticated role may read.
pub fn standard_role_permissions(role: &Role) -> Vec<Permission> {
    match role.as_str() {
        "admin" => vec![Permission::WILDCARD],
        _ => vec![Permission::FORECAST_READ],
    }
}

/// [`RoleGate`] backed by a role→permission mapping.
#[derive(Clone)]
pub struct PermissionRoleGate<F> {
    role_permissions: F,
}

impl PermissionRoleGate<fn(&Role) -> Vec<Permission>> {
    pub fn standard() -> Self {
        Self::new(standard_role_permissions)
    }
}

impl<F> PermissionRoleGate<F>
where
    F: Fn(&Role) -> Vec<Permission> + Send + Sync,
{
    pub fn new(role_permissions: F) -> Self {
        Self { role_permissions }
    }

    /// Union of the permissions granted by every role the principal holds.
    pub fn effective_permissions(&self, principal: &Principal) -> Vec<Permission> {
        let mut seen: HashSet<Permission> = HashSet::new();
        let mut out = Vec::new();
        for role in &principal.roles {
            for perm in (self.role_permissions)(role) {
                if seen.insert(perm.clone()) {
                    out.push(perm);
                }
            }
        }
        out
    }

    pub fn check(&self, principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
        authorize(&self.effective_permissions(principal), required)
    }
}

impl<F> core::fmt::Debug for PermissionRoleGate<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionRoleGate").finish_non_exhaustive()
    }
}

impl<F> RoleGate for PermissionRoleGate<F>
where
    F: Fn(&Role) -> Vec<Permission> + Send + Sync,
{
    fn can_generate(&self, principal: &Principal) -> bool {
        self.check(principal, &Permission::FORECAST_GENERATE).is_ok()
    }

    fn can_manage(&self, principal: &Principal) -> bool {
        self.check(principal, &Permission::FORECAST_MANAGE).is_ok()
    }

    fn can_view(&self, principal: &Principal) -> bool {
        self.check(principal, &Permission::FORECAST_READ).is_ok()
    }

    fn can_record_sales(&self, principal: &Principal) -> bool {
        self.check(principal, &Permission::SALES_WRITE).is_ok()
    }
}

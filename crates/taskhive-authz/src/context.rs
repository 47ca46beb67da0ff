//! Tenant context resolution.
//!
//! The effective tenant context for a request is derived from the
//! principal once, up front. Everything downstream queries through it,
//! so the isolation invariant is enforced at the query-construction
//! boundary instead of relying on call-site discipline.

use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::principal::{Principal, Role};
use uuid::Uuid;

/// The resolved tenant context of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantContext {
    /// Bound to a concrete tenant; every store query for this request
    /// carries this id as an equality filter.
    Scoped(Uuid),
    /// Super-admin bypass. Valid only for tenant-administration
    /// operations; can never satisfy a concrete tenant filter.
    Unscoped,
}

impl TenantContext {
    /// Derive the context from the principal.
    ///
    /// Super admins resolve to [`TenantContext::Unscoped`]; any other
    /// principal without a tenant is rejected.
    pub fn resolve(principal: &Principal) -> TaskHiveResult<TenantContext> {
        if principal.role == Role::SuperAdmin {
            return Ok(TenantContext::Unscoped);
        }
        match principal.tenant_id {
            Some(tenant_id) => Ok(TenantContext::Scoped(tenant_id)),
            None => Err(TaskHiveError::MissingTenantContext),
        }
    }

    /// The concrete tenant id, for operations that require one.
    ///
    /// An unscoped context fails here: the bypass never extends to
    /// tenant-scoped resources.
    pub fn require_tenant(&self) -> TaskHiveResult<Uuid> {
        match self {
            TenantContext::Scoped(tenant_id) => Ok(*tenant_id),
            TenantContext::Unscoped => Err(TaskHiveError::MissingTenantContext),
        }
    }

    pub fn is_unscoped(&self) -> bool {
        matches!(self, TenantContext::Unscoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role, tenant_id: Option<Uuid>) -> Principal {
        Principal::new(Uuid::new_v4(), role, tenant_id)
    }

    #[test]
    fn member_resolves_to_scoped_context() {
        let tenant_id = Uuid::new_v4();
        let ctx = TenantContext::resolve(&principal(Role::User, Some(tenant_id))).unwrap();
        assert_eq!(ctx, TenantContext::Scoped(tenant_id));
        assert_eq!(ctx.require_tenant().unwrap(), tenant_id);
    }

    #[test]
    fn member_without_tenant_is_rejected() {
        let err = TenantContext::resolve(&principal(Role::TenantAdmin, None)).unwrap_err();
        assert!(matches!(err, TaskHiveError::MissingTenantContext));
    }

    #[test]
    fn super_admin_resolves_unscoped() {
        let ctx = TenantContext::resolve(&principal(Role::SuperAdmin, None)).unwrap();
        assert!(ctx.is_unscoped());
    }

    #[test]
    fn unscoped_context_never_yields_a_tenant_filter() {
        let ctx = TenantContext::resolve(&principal(Role::SuperAdmin, None)).unwrap();
        let err = ctx.require_tenant().unwrap_err();
        assert!(matches!(err, TaskHiveError::MissingTenantContext));
    }
}

//! Tenant policy: self-service vs. platform administration.

use taskhive_core::error::TaskHiveResult;
use taskhive_core::models::principal::Principal;

use crate::context::TenantContext;
use crate::policy::TenantFilter;
use crate::role;

/// Self-service access: any authenticated tenant-bound principal may
/// read or update (name only) the tenant bound to its own context.
pub fn authorize_self_service(principal: &Principal) -> TaskHiveResult<TenantFilter> {
    let ctx = TenantContext::resolve(principal)?;
    Ok(TenantFilter::new(ctx.require_tenant()?))
}

/// Platform administration: list-all, plan changes, status changes.
/// Super-admin only, operating unscoped on Tenant entities.
pub fn authorize_platform_admin(principal: &Principal) -> TaskHiveResult<()> {
    role::require_super_admin(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_core::error::TaskHiveError;
    use taskhive_core::models::principal::Role;
    use uuid::Uuid;

    #[test]
    fn self_service_binds_to_own_tenant() {
        let tenant_id = Uuid::new_v4();
        let principal = Principal::new(Uuid::new_v4(), Role::User, Some(tenant_id));
        let filter = authorize_self_service(&principal).unwrap();
        assert_eq!(filter.tenant_id(), tenant_id);
    }

    #[test]
    fn super_admin_has_no_self_service_tenant() {
        let principal = Principal::new(Uuid::new_v4(), Role::SuperAdmin, None);
        assert!(matches!(
            authorize_self_service(&principal).unwrap_err(),
            TaskHiveError::MissingTenantContext
        ));
    }

    #[test]
    fn platform_admin_requires_super_admin() {
        let admin = Principal::new(Uuid::new_v4(), Role::TenantAdmin, Some(Uuid::new_v4()));
        assert!(authorize_platform_admin(&admin).is_err());

        let root = Principal::new(Uuid::new_v4(), Role::SuperAdmin, None);
        assert!(authorize_platform_admin(&root).is_ok());
    }
}

//! Project policy.

use taskhive_core::error::TaskHiveResult;
use taskhive_core::models::principal::{Principal, Role};

use crate::context::TenantContext;
use crate::policy::TenantFilter;
use crate::role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOperation {
    Create,
    Delete,
    List,
}

pub fn authorize(principal: &Principal, op: ProjectOperation) -> TaskHiveResult<TenantFilter> {
    let ctx = TenantContext::resolve(principal)?;
    let tenant_id = ctx.require_tenant()?;

    match op {
        ProjectOperation::Create | ProjectOperation::Delete => {
            role::require(principal, Role::TenantAdmin)?;
        }
        ProjectOperation::List => {
            role::require(principal, Role::User)?;
        }
    }

    Ok(TenantFilter::new(tenant_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_core::error::TaskHiveError;
    use uuid::Uuid;

    #[test]
    fn mutation_requires_tenant_admin() {
        let plain = Principal::new(Uuid::new_v4(), Role::User, Some(Uuid::new_v4()));
        assert!(matches!(
            authorize(&plain, ProjectOperation::Create).unwrap_err(),
            TaskHiveError::InsufficientRole { .. }
        ));
        assert!(authorize(&plain, ProjectOperation::List).is_ok());
    }
}

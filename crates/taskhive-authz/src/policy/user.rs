//! User policy.
//!
//! All user management requires at least `TenantAdmin`. Deletion
//! additionally runs two target-protecting guards, in this order:
//! self-deletion first, then last-admin. Both are evaluated even
//! though the actor already passed the role gate: the guards protect
//! the *target* of the deletion, not the actor.

use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::principal::{Principal, Role};
use taskhive_core::models::user::User;

use crate::context::TenantContext;
use crate::policy::TenantFilter;
use crate::role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    Create,
    Update,
    Delete,
    List,
}

pub fn authorize(principal: &Principal, _op: UserOperation) -> TaskHiveResult<TenantFilter> {
    let ctx = TenantContext::resolve(principal)?;
    let tenant_id = ctx.require_tenant()?;
    role::require(principal, Role::TenantAdmin)?;
    Ok(TenantFilter::new(tenant_id))
}

/// Self-deletion guard. Fires before the last-admin count is even
/// consulted.
pub fn check_self_deletion(principal: &Principal, target: &User) -> TaskHiveResult<()> {
    if target.id == principal.user_id {
        return Err(TaskHiveError::CannotDeleteSelf);
    }
    Ok(())
}

/// Last-admin guard: a tenant must keep at least one admin.
pub fn check_last_admin(target: &User, tenant_admin_count: u64) -> TaskHiveResult<()> {
    if target.role == Role::TenantAdmin && tenant_admin_count <= 1 {
        return Err(TaskHiveError::TenantRequiresAdmin);
    }
    Ok(())
}

//! Task policy.

use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::principal::{Principal, Role};
use taskhive_core::models::task::Task;

use crate::context::TenantContext;
use crate::policy::TenantFilter;
use crate::role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOperation {
    Create,
    Update,
    UpdateStatus,
    Delete,
    List,
}

/// Tenant-scope and role-floor decision for a task operation.
///
/// Create/update/delete require at least `TenantAdmin`; listing and
/// status changes have no floor beyond an authenticated tenant member
/// (the assignee-ownership guard is applied against the fetched task
/// by [`check_status_change`]).
pub fn authorize(principal: &Principal, op: TaskOperation) -> TaskHiveResult<TenantFilter> {
    let ctx = TenantContext::resolve(principal)?;
    let tenant_id = ctx.require_tenant()?;

    match op {
        TaskOperation::Create | TaskOperation::Update | TaskOperation::Delete => {
            role::require(principal, Role::TenantAdmin)?;
        }
        TaskOperation::UpdateStatus | TaskOperation::List => {
            role::require(principal, Role::User)?;
        }
    }

    Ok(TenantFilter::new(tenant_id))
}

/// Assignee-ownership guard for status changes.
///
/// Tenant admins may move any task in their tenant; a plain user only
/// their own assigned tasks.
pub fn check_status_change(principal: &Principal, task: &Task) -> TaskHiveResult<()> {
    if principal.role == Role::User && task.assigned_to_id != Some(principal.user_id) {
        return Err(TaskHiveError::NotAssignee);
    }
    Ok(())
}

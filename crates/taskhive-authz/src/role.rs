//! Role gate.
//!
//! `User < TenantAdmin` on the ordered axis. `SuperAdmin` sits on a
//! separate platform axis: it satisfies only checks that explicitly
//! accept it (tenant administration) and never a tenant-scoped role
//! floor, since a super admin has no tenant to scope those operations
//! to.

use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::principal::{Principal, Role};

/// Require at least `min` on the ordered tenant-role axis.
pub fn require(principal: &Principal, min: Role) -> TaskHiveResult<()> {
    let satisfied = match (principal.role, min) {
        (Role::User, Role::User) => true,
        (Role::TenantAdmin, Role::User | Role::TenantAdmin) => true,
        _ => false,
    };
    if satisfied {
        Ok(())
    } else {
        Err(TaskHiveError::InsufficientRole { required: min })
    }
}

/// Require the platform-admin axis.
pub fn require_super_admin(principal: &Principal) -> TaskHiveResult<()> {
    if principal.role == Role::SuperAdmin {
        Ok(())
    } else {
        Err(TaskHiveError::InsufficientRole {
            required: Role::SuperAdmin,
        })
    }
}

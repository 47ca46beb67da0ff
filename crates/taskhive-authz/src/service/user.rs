//! User operations.

use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::audit::AuditAction;
use taskhive_core::models::principal::{Principal, RequestMeta, Role};
use taskhive_core::models::user::{CreateUser, UpdateUser, User};
use taskhive_core::repository::{
    AuditLogRepository, PaginatedResult, Pagination, UserRepository,
};
use uuid::Uuid;

use crate::audit::AuditSink;
use crate::policy::user::{self as user_policy, UserOperation};

/// Transport-level input for user creation; the tenant comes from the
/// resolved context.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

/// User operation orchestrator.
pub struct UserService<U, A>
where
    U: UserRepository,
    A: AuditLogRepository,
{
    users: U,
    audit: AuditSink<A>,
}

impl<U, A> UserService<U, A>
where
    U: UserRepository,
    A: AuditLogRepository,
{
    pub fn new(users: U, audit: AuditSink<A>) -> Self {
        Self { users, audit }
    }

    /// Tenant members carry `User` or `TenantAdmin`; the platform role
    /// is never assignable through this surface.
    fn check_assignable_role(role: Role) -> TaskHiveResult<()> {
        match role {
            Role::User | Role::TenantAdmin => Ok(()),
            Role::SuperAdmin => Err(TaskHiveError::Validation {
                message: "role must be user or tenant_admin".into(),
            }),
        }
    }

    pub async fn create_user(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        input: NewUser,
    ) -> TaskHiveResult<User> {
        // 1. Tenant scope + role floor.
        let filter = user_policy::authorize(principal, UserOperation::Create)?;
        let tenant_id = filter.tenant_id();

        // 2. Input validation.
        Self::check_assignable_role(input.role)?;

        // 3. Per-tenant email uniqueness. The store's unique index on
        //    (tenant_id, email) backstops the race window between this
        //    check and the create.
        match self.users.get_by_email(tenant_id, &input.email).await {
            Ok(_) => {
                return Err(TaskHiveError::DuplicateEmail {
                    email: input.email,
                });
            }
            Err(TaskHiveError::NotFound { .. }) => {}
            Err(other) => return Err(other),
        }

        // 4. Create.
        let user = self
            .users
            .create(CreateUser {
                tenant_id,
                email: input.email,
                password: input.password,
                full_name: input.full_name,
                role: input.role,
            })
            .await?;

        // 5. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::CreateUser,
                "user",
                user.id,
                meta,
            )
            .await;

        Ok(user)
    }

    pub async fn list_users(
        &self,
        principal: &Principal,
        pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<User>> {
        let filter = user_policy::authorize(principal, UserOperation::List)?;
        self.users.list(filter.tenant_id(), pagination).await
    }

    pub async fn update_user(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        user_id: Uuid,
        input: UpdateUser,
    ) -> TaskHiveResult<User> {
        // 1. Tenant scope + role floor.
        let filter = user_policy::authorize(principal, UserOperation::Update)?;
        let tenant_id = filter.tenant_id();

        // 2. Input validation.
        if let Some(role) = input.role {
            Self::check_assignable_role(role)?;
        }

        // 3. Target must be visible within the tenant.
        self.users.get_by_id(tenant_id, user_id).await?;

        // 4. Update.
        let updated = self.users.update(tenant_id, user_id, input).await?;

        // 5. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::UpdateUser,
                "user",
                updated.id,
                meta,
            )
            .await;

        Ok(updated)
    }

    pub async fn delete_user(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        user_id: Uuid,
    ) -> TaskHiveResult<()> {
        // 1. Tenant scope + role floor.
        let filter = user_policy::authorize(principal, UserOperation::Delete)?;
        let tenant_id = filter.tenant_id();

        // 2. Fetch the target.
        let target = self.users.get_by_id(tenant_id, user_id).await?;

        // 3. Self-deletion guard, before the admin count is consulted.
        user_policy::check_self_deletion(principal, &target)?;

        // 4. Last-admin guard.
        if target.role == Role::TenantAdmin {
            let admin_count = self
                .users
                .count_by_role(tenant_id, Role::TenantAdmin)
                .await?;
            user_policy::check_last_admin(&target, admin_count)?;
        }

        // 5. Delete.
        self.users.delete(tenant_id, user_id).await?;

        // 6. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::DeleteUser,
                "user",
                user_id,
                meta,
            )
            .await;

        Ok(())
    }
}

//! Tenant operations: self-service and platform administration.

use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::audit::AuditAction;
use taskhive_core::models::principal::{Principal, RequestMeta};
use taskhive_core::models::tenant::{Tenant, TenantStatus, UpdateTenant};
use taskhive_core::plan::{PlanLimits, SubscriptionPlan};
use taskhive_core::repository::{
    AuditLogRepository, PaginatedResult, Pagination, TenantRepository,
};
use uuid::Uuid;

use crate::audit::AuditSink;
use crate::policy::tenant as tenant_policy;

/// Tenant operation orchestrator.
pub struct TenantService<T, A>
where
    T: TenantRepository,
    A: AuditLogRepository,
{
    tenants: T,
    audit: AuditSink<A>,
}

impl<T, A> TenantService<T, A>
where
    T: TenantRepository,
    A: AuditLogRepository,
{
    pub fn new(tenants: T, audit: AuditSink<A>) -> Self {
        Self { tenants, audit }
    }

    // -------------------------------------------------------------------
    // Self-service (any authenticated tenant member, own tenant only)
    // -------------------------------------------------------------------

    pub async fn get_my_tenant(&self, principal: &Principal) -> TaskHiveResult<Tenant> {
        let filter = tenant_policy::authorize_self_service(principal)?;
        self.tenants.get_by_id(filter.tenant_id()).await
    }

    /// Update mutable attributes (name) of the caller's own tenant.
    /// Plan and quota fields are not reachable from this path.
    pub async fn update_my_tenant(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        input: UpdateTenant,
    ) -> TaskHiveResult<Tenant> {
        // 1. Bind to the caller's own tenant.
        let filter = tenant_policy::authorize_self_service(principal)?;
        let tenant_id = filter.tenant_id();

        // 2. Update.
        let tenant = self.tenants.update(tenant_id, input).await?;

        // 3. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::UpdateTenant,
                "tenant",
                tenant.id,
                meta,
            )
            .await;

        Ok(tenant)
    }

    // -------------------------------------------------------------------
    // Platform administration (super-admin, unscoped)
    // -------------------------------------------------------------------

    pub async fn list_tenants(
        &self,
        principal: &Principal,
        pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<Tenant>> {
        tenant_policy::authorize_platform_admin(principal)?;
        self.tenants.list(pagination).await
    }

    /// Change a tenant's subscription plan.
    ///
    /// The plan string is resolved through the plan table before any
    /// write: an unrecognized plan performs no write at all, and a
    /// recognized one updates plan and quota fields as one unit.
    pub async fn update_tenant_plan(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        tenant_id: Uuid,
        plan: &str,
    ) -> TaskHiveResult<Tenant> {
        // 1. Platform-admin gate.
        tenant_policy::authorize_platform_admin(principal)?;

        // 2. Resolve the plan before touching the store.
        let plan = SubscriptionPlan::parse(plan).ok_or_else(|| TaskHiveError::InvalidPlan {
            plan: plan.to_string(),
        })?;
        let limits = PlanLimits::for_plan(plan);

        // 3. Write plan + quotas atomically.
        let tenant = self.tenants.update_plan(tenant_id, plan, limits).await?;

        // 4. Audit. Platform-admin actions carry no tenant context of
        //    their own; the target tenant is the entity id.
        self.audit
            .record(
                None,
                principal,
                AuditAction::UpdateTenant,
                "tenant",
                tenant.id,
                meta,
            )
            .await;

        Ok(tenant)
    }

    pub async fn update_tenant_status(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        tenant_id: Uuid,
        status: &str,
    ) -> TaskHiveResult<Tenant> {
        // 1. Platform-admin gate.
        tenant_policy::authorize_platform_admin(principal)?;

        // 2. Validate the status value.
        let status = TenantStatus::parse(status).ok_or_else(|| TaskHiveError::Validation {
            message: "Invalid tenant status".into(),
        })?;

        // 3. Update.
        let tenant = self.tenants.update_status(tenant_id, status).await?;

        // 4. Audit.
        self.audit
            .record(
                None,
                principal,
                AuditAction::UpdateTenant,
                "tenant",
                tenant.id,
                meta,
            )
            .await;

        Ok(tenant)
    }
}

//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation: the
//! tenant filter is a structural argument of every query, not caller
//! discipline. Only the tenant repository itself operates globally
//! (platform administration).

use uuid::Uuid;

use crate::error::TaskHiveResult;
use crate::models::{
    audit::{AuditLogEntry, CreateAuditLogEntry},
    principal::Role,
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskStatus, UpdateTask},
    tenant::{CreateTenant, Tenant, TenantStatus, UpdateTenant},
    user::{CreateUser, UpdateUser, User},
};
use crate::plan::{PlanLimits, SubscriptionPlan};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenants (global scope, platform administration)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = TaskHiveResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TaskHiveResult<Tenant>> + Send;
    /// Self-service update: mutable attributes only (name).
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = TaskHiveResult<Tenant>> + Send;
    /// Plan and its derived quotas are written as one unit.
    fn update_plan(
        &self,
        id: Uuid,
        plan: SubscriptionPlan,
        limits: PlanLimits,
    ) -> impl Future<Output = TaskHiveResult<Tenant>> + Send;
    fn update_status(
        &self,
        id: Uuid,
        status: TenantStatus,
    ) -> impl Future<Output = TaskHiveResult<Tenant>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = TaskHiveResult<PaginatedResult<Tenant>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = TaskHiveResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = TaskHiveResult<User>> + Send;
    fn get_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> impl Future<Output = TaskHiveResult<User>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = TaskHiveResult<User>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = TaskHiveResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = TaskHiveResult<PaginatedResult<User>>> + Send;
    /// Number of users with the given role in the tenant (last-admin
    /// guard).
    fn count_by_role(
        &self,
        tenant_id: Uuid,
        role: Role,
    ) -> impl Future<Output = TaskHiveResult<u64>> + Send;
}

pub trait ProjectRepository: Send + Sync {
    fn create(&self, input: CreateProject)
    -> impl Future<Output = TaskHiveResult<Project>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = TaskHiveResult<Project>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = TaskHiveResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = TaskHiveResult<PaginatedResult<Project>>> + Send;
}

pub trait TaskRepository: Send + Sync {
    fn create(&self, input: CreateTask) -> impl Future<Output = TaskHiveResult<Task>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = TaskHiveResult<Task>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateTask,
    ) -> impl Future<Output = TaskHiveResult<Task>> + Send;
    fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: TaskStatus,
    ) -> impl Future<Output = TaskHiveResult<Task>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid)
    -> impl Future<Output = TaskHiveResult<()>> + Send;
    fn list_by_project(
        &self,
        tenant_id: Uuid,
        project_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = TaskHiveResult<PaginatedResult<Task>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

/// Query filters for audit log entries.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub actor_user_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity_id: Option<Uuid>,
}

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit log entry. No update or delete operations
    /// exist.
    fn append(
        &self,
        input: CreateAuditLogEntry,
    ) -> impl Future<Output = TaskHiveResult<AuditLogEntry>> + Send;
    fn list(
        &self,
        tenant_id: Option<Uuid>,
        filter: AuditLogFilter,
        pagination: Pagination,
    ) -> impl Future<Output = TaskHiveResult<PaginatedResult<AuditLogEntry>>> + Send;
}

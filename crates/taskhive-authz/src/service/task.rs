//! Task operations.

use chrono::{DateTime, Utc};
use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::audit::AuditAction;
use taskhive_core::models::principal::{Principal, RequestMeta};
use taskhive_core::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
use taskhive_core::repository::{
    AuditLogRepository, PaginatedResult, Pagination, ProjectRepository, TaskRepository,
    UserRepository,
};
use uuid::Uuid;

use crate::audit::AuditSink;
use crate::policy::task::{self as task_policy, TaskOperation};

/// Transport-level input for task creation; tenant and project are
/// supplied by the authorization flow, never by the caller's body.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub assigned_to_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Task operation orchestrator.
pub struct TaskService<T, P, U, A>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    A: AuditLogRepository,
{
    tasks: T,
    projects: P,
    users: U,
    audit: AuditSink<A>,
}

impl<T, P, U, A> TaskService<T, P, U, A>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    A: AuditLogRepository,
{
    pub fn new(tasks: T, projects: P, users: U, audit: AuditSink<A>) -> Self {
        Self {
            tasks,
            projects,
            users,
            audit,
        }
    }

    /// Any assignee must reference an active user of the tenant.
    async fn check_assignee(&self, tenant_id: Uuid, assignee_id: Uuid) -> TaskHiveResult<()> {
        let assignee = self
            .users
            .get_by_id(tenant_id, assignee_id)
            .await
            .map_err(|e| match e {
                TaskHiveError::NotFound { .. } => TaskHiveError::AssigneeNotInTenant,
                other => other,
            })?;
        if !assignee.is_active {
            return Err(TaskHiveError::AssigneeNotInTenant);
        }
        Ok(())
    }

    pub async fn create_task(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        project_id: Uuid,
        input: NewTask,
    ) -> TaskHiveResult<Task> {
        // 1. Tenant scope + role floor.
        let filter = task_policy::authorize(principal, TaskOperation::Create)?;
        let tenant_id = filter.tenant_id();

        // 2. Referenced project must belong to the same tenant.
        self.projects
            .get_by_id(tenant_id, project_id)
            .await
            .map_err(|e| match e {
                TaskHiveError::NotFound { .. } => TaskHiveError::InvalidReference {
                    entity: "project",
                },
                other => other,
            })?;

        // 3. Assignee, if any, must be an active member of the tenant.
        if let Some(assignee_id) = input.assigned_to_id {
            self.check_assignee(tenant_id, assignee_id).await?;
        }

        // 4. Create.
        let task = self
            .tasks
            .create(CreateTask {
                tenant_id,
                project_id,
                title: input.title,
                description: input.description,
                priority: input.priority,
                assigned_to_id: input.assigned_to_id,
                due_date: input.due_date,
            })
            .await?;

        // 5. Audit, strictly after the confirmed store result.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::CreateTask,
                "task",
                task.id,
                meta,
            )
            .await;

        Ok(task)
    }

    pub async fn list_tasks(
        &self,
        principal: &Principal,
        project_id: Uuid,
        pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<Task>> {
        let filter = task_policy::authorize(principal, TaskOperation::List)?;
        self.tasks
            .list_by_project(filter.tenant_id(), project_id, pagination)
            .await
    }

    pub async fn update_task(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        task_id: Uuid,
        input: UpdateTask,
    ) -> TaskHiveResult<Task> {
        // 1. Tenant scope + role floor.
        let filter = task_policy::authorize(principal, TaskOperation::Update)?;
        let tenant_id = filter.tenant_id();

        // 2. Target must be visible within the tenant. A task in
        //    another tenant is indistinguishable from a missing one.
        self.tasks.get_by_id(tenant_id, task_id).await?;

        // 3. Reassignment goes through the same assignee check as
        //    creation.
        if let Some(assignee_id) = input.assigned_to_id {
            self.check_assignee(tenant_id, assignee_id).await?;
        }

        // 4. Update.
        let updated = self.tasks.update(tenant_id, task_id, input).await?;

        // 5. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::UpdateTask,
                "task",
                updated.id,
                meta,
            )
            .await;

        Ok(updated)
    }

    pub async fn update_task_status(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        task_id: Uuid,
        status: TaskStatus,
    ) -> TaskHiveResult<Task> {
        // 1. Tenant scope; no role floor beyond authenticated.
        let filter = task_policy::authorize(principal, TaskOperation::UpdateStatus)?;
        let tenant_id = filter.tenant_id();

        // 2. Fetch the target, then apply the assignee-ownership guard.
        let task = self.tasks.get_by_id(tenant_id, task_id).await?;
        task_policy::check_status_change(principal, &task)?;

        // 3. Update.
        let updated = self.tasks.update_status(tenant_id, task_id, status).await?;

        // 4. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::UpdateTaskStatus,
                "task",
                updated.id,
                meta,
            )
            .await;

        Ok(updated)
    }

    pub async fn delete_task(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        task_id: Uuid,
    ) -> TaskHiveResult<()> {
        // 1. Tenant scope + role floor.
        let filter = task_policy::authorize(principal, TaskOperation::Delete)?;
        let tenant_id = filter.tenant_id();

        // 2. Target must be visible within the tenant.
        self.tasks.get_by_id(tenant_id, task_id).await?;

        // 3. Delete.
        self.tasks.delete(tenant_id, task_id).await?;

        // 4. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::DeleteTask,
                "task",
                task_id,
                meta,
            )
            .await;

        Ok(())
    }
}

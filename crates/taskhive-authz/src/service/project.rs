//! Project operations.

use taskhive_core::error::TaskHiveResult;
use taskhive_core::models::audit::AuditAction;
use taskhive_core::models::principal::{Principal, RequestMeta};
use taskhive_core::models::project::{CreateProject, Project};
use taskhive_core::repository::{
    AuditLogRepository, PaginatedResult, Pagination, ProjectRepository,
};
use uuid::Uuid;

use crate::audit::AuditSink;
use crate::policy::project::{self as project_policy, ProjectOperation};

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

/// Project operation orchestrator.
pub struct ProjectService<P, A>
where
    P: ProjectRepository,
    A: AuditLogRepository,
{
    projects: P,
    audit: AuditSink<A>,
}

impl<P, A> ProjectService<P, A>
where
    P: ProjectRepository,
    A: AuditLogRepository,
{
    pub fn new(projects: P, audit: AuditSink<A>) -> Self {
        Self { projects, audit }
    }

    pub async fn create_project(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        input: NewProject,
    ) -> TaskHiveResult<Project> {
        // 1. Tenant scope + role floor.
        let filter = project_policy::authorize(principal, ProjectOperation::Create)?;
        let tenant_id = filter.tenant_id();

        // 2. Create.
        let project = self
            .projects
            .create(CreateProject {
                tenant_id,
                name: input.name,
                description: input.description,
            })
            .await?;

        // 3. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::CreateProject,
                "project",
                project.id,
                meta,
            )
            .await;

        Ok(project)
    }

    pub async fn list_projects(
        &self,
        principal: &Principal,
        pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<Project>> {
        let filter = project_policy::authorize(principal, ProjectOperation::List)?;
        self.projects.list(filter.tenant_id(), pagination).await
    }

    pub async fn delete_project(
        &self,
        principal: &Principal,
        meta: &RequestMeta,
        project_id: Uuid,
    ) -> TaskHiveResult<()> {
        // 1. Tenant scope + role floor.
        let filter = project_policy::authorize(principal, ProjectOperation::Delete)?;
        let tenant_id = filter.tenant_id();

        // 2. Target must be visible within the tenant.
        self.projects.get_by_id(tenant_id, project_id).await?;

        // 3. Delete.
        self.projects.delete(tenant_id, project_id).await?;

        // 4. Audit.
        self.audit
            .record(
                Some(tenant_id),
                principal,
                AuditAction::DeleteProject,
                "project",
                project_id,
                meta,
            )
            .await;

        Ok(())
    }
}

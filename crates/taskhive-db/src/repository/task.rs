//! SurrealDB implementation of [`TaskRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use taskhive_core::error::TaskHiveResult;
use taskhive_core::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
use taskhive_core::repository::{PaginatedResult, Pagination, TaskRepository};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TaskRow {
    tenant_id: String,
    project_id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    assigned_to_id: Option<String>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self, id: Uuid) -> Result<Task, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        let assigned_to_id = self
            .assigned_to_id
            .map(|s| {
                Uuid::parse_str(&s).map_err(|e| DbError::Decode(format!("invalid assignee UUID: {e}")))
            })
            .transpose()?;
        Ok(Task {
            id,
            tenant_id,
            project_id,
            title: self.title,
            description: self.description,
            status: parse_status(&self.status)?,
            priority: parse_priority(&self.priority)?,
            assigned_to_id,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TaskRowWithId {
    record_id: String,
    tenant_id: String,
    project_id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    assigned_to_id: Option<String>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRowWithId {
    fn try_into_task(self) -> Result<Task, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let row = TaskRow {
            tenant_id: self.tenant_id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assigned_to_id: self.assigned_to_id,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_task(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<TaskStatus, DbError> {
    TaskStatus::parse(s).ok_or_else(|| DbError::Decode(format!("unknown task status: {s}")))
}

fn parse_priority(s: &str) -> Result<TaskPriority, DbError> {
    TaskPriority::parse(s).ok_or_else(|| DbError::Decode(format!("unknown task priority: {s}")))
}

/// SurrealDB implementation of the Task repository.
#[derive(Clone)]
pub struct SurrealTaskRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTaskRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TaskRepository for SurrealTaskRepository<C> {
    async fn create(&self, input: CreateTask) -> TaskHiveResult<Task> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let priority = input.priority.unwrap_or(TaskPriority::Medium);

        let result = self
            .db
            .query(
                "CREATE type::record('task', $id) SET \
                 tenant_id = $tenant_id, \
                 project_id = $project_id, \
                 title = $title, \
                 description = $description, \
                 status = 'todo', \
                 priority = $priority, \
                 assigned_to_id = $assigned_to_id, \
                 due_date = $due_date",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("priority", priority.as_str()))
            .bind(("assigned_to_id", input.assigned_to_id.map(|u| u.to_string())))
            .bind(("due_date", input.due_date))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "task".into(),
            id: id_str,
        })?;

        Ok(row.into_task(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> TaskHiveResult<Task> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('task', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "task".into(),
            id: id_str,
        })?;

        Ok(row.into_task(id)?)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateTask) -> TaskHiveResult<Task> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.priority.is_some() {
            sets.push("priority = $priority");
        }
        if input.assigned_to_id.is_some() {
            sets.push("assigned_to_id = $assigned_to_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('task', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(priority) = input.priority {
            builder = builder.bind(("priority", priority.as_str()));
        }
        if let Some(assigned_to_id) = input.assigned_to_id {
            builder = builder.bind(("assigned_to_id", assigned_to_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "task".into(),
            id: id_str,
        })?;

        Ok(row.into_task(id)?)
    }

    async fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: TaskStatus,
    ) -> TaskHiveResult<Task> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('task', $id) SET \
                 status = $status, updated_at = time::now() \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("status", status.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "task".into(),
            id: id_str,
        })?;

        Ok(row.into_task(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> TaskHiveResult<()> {
        self.db
            .query(
                "DELETE type::record('task', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_project(
        &self,
        tenant_id: Uuid,
        project_id: Uuid,
        pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<Task>> {
        let tenant_id_str = tenant_id.to_string();
        let project_id_str = project_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM task \
                 WHERE tenant_id = $tenant_id \
                 AND project_id = $project_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .bind(("project_id", project_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM task \
                 WHERE tenant_id = $tenant_id \
                 AND project_id = $project_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("project_id", project_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_task())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

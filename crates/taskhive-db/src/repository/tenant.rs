//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use taskhive_core::error::TaskHiveResult;
use taskhive_core::models::tenant::{CreateTenant, Tenant, TenantStatus, UpdateTenant};
use taskhive_core::plan::{PlanLimits, SubscriptionPlan};
use taskhive_core::repository::{PaginatedResult, Pagination, TenantRepository};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    status: String,
    subscription_plan: String,
    max_users: u32,
    max_projects: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id,
            name: self.name,
            status: parse_status(&self.status)?,
            subscription_plan: parse_plan(&self.subscription_plan)?,
            max_users: self.max_users,
            max_projects: self.max_projects,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    status: String,
    subscription_plan: String,
    max_users: u32,
    max_projects: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Tenant {
            id,
            name: self.name,
            status: parse_status(&self.status)?,
            subscription_plan: parse_plan(&self.subscription_plan)?,
            max_users: self.max_users,
            max_projects: self.max_projects,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<TenantStatus, DbError> {
    TenantStatus::parse(s).ok_or_else(|| DbError::Decode(format!("unknown tenant status: {s}")))
}

fn parse_plan(s: &str) -> Result<SubscriptionPlan, DbError> {
    SubscriptionPlan::parse(s)
        .ok_or_else(|| DbError::Decode(format!("unknown subscription plan: {s}")))
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> TaskHiveResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Quota fields are derived from the plan table at creation,
        // same as on every later plan change.
        let limits = PlanLimits::for_plan(input.subscription_plan);

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, \
                 status = 'active', \
                 subscription_plan = $plan, \
                 max_users = $max_users, \
                 max_projects = $max_projects",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("plan", input.subscription_plan.as_str()))
            .bind(("max_users", limits.max_users))
            .bind(("max_projects", limits.max_projects))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> TaskHiveResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> TaskHiveResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('tenant', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn update_plan(
        &self,
        id: Uuid,
        plan: SubscriptionPlan,
        limits: PlanLimits,
    ) -> TaskHiveResult<Tenant> {
        let id_str = id.to_string();

        // Plan and quotas change in a single statement so a reader
        // never observes one without the other.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('tenant', $id) SET \
                 subscription_plan = $plan, \
                 max_users = $max_users, \
                 max_projects = $max_projects, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("plan", plan.as_str()))
            .bind(("max_users", limits.max_users))
            .bind(("max_projects", limits.max_projects))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn update_status(&self, id: Uuid, status: TenantStatus) -> TaskHiveResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('tenant', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn list(&self, pagination: Pagination) -> TaskHiveResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM tenant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_tenant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! Append and list only; the table's schema permissions reject
//! updates and deletes.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use taskhive_core::error::TaskHiveResult;
use taskhive_core::models::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};
use taskhive_core::repository::{AuditLogFilter, AuditLogRepository, PaginatedResult, Pagination};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    tenant_id: Option<String>,
    actor_user_id: String,
    action: String,
    entity_type: String,
    entity_id: String,
    ip_address: Option<String>,
    timestamp: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self, id: Uuid) -> Result<AuditLogEntry, DbError> {
        let tenant_id = self
            .tenant_id
            .map(|s| {
                Uuid::parse_str(&s).map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))
            })
            .transpose()?;
        let actor_user_id = Uuid::parse_str(&self.actor_user_id)
            .map_err(|e| DbError::Decode(format!("invalid actor UUID: {e}")))?;
        let entity_id = Uuid::parse_str(&self.entity_id)
            .map_err(|e| DbError::Decode(format!("invalid entity UUID: {e}")))?;
        let action = AuditAction::parse(&self.action)
            .ok_or_else(|| DbError::Decode(format!("unknown audit action: {}", self.action)))?;
        Ok(AuditLogEntry {
            id,
            tenant_id,
            actor_user_id,
            action,
            entity_type: self.entity_type,
            entity_id,
            ip_address: self.ip_address,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    tenant_id: Option<String>,
    actor_user_id: String,
    action: String,
    entity_type: String,
    entity_id: String,
    ip_address: Option<String>,
    timestamp: DateTime<Utc>,
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AuditLogEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let row = AuditRow {
            tenant_id: self.tenant_id,
            actor_user_id: self.actor_user_id,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            ip_address: self.ip_address,
            timestamp: self.timestamp,
        };
        row.into_entry(id)
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the audit log repository.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditLogEntry) -> TaskHiveResult<AuditLogEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 tenant_id = $tenant_id, \
                 actor_user_id = $actor_user_id, \
                 action = $action, \
                 entity_type = $entity_type, \
                 entity_id = $entity_id, \
                 ip_address = $ip_address",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("actor_user_id", input.actor_user_id.to_string()))
            .bind(("action", input.action.as_str()))
            .bind(("entity_type", input.entity_type))
            .bind(("entity_id", input.entity_id.to_string()))
            .bind(("ip_address", input.ip_address))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn list(
        &self,
        tenant_id: Option<Uuid>,
        filter: AuditLogFilter,
        pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<AuditLogEntry>> {
        let mut conditions = vec![match tenant_id {
            Some(_) => "tenant_id = $tenant_id",
            None => "tenant_id IS NONE",
        }];
        if filter.actor_user_id.is_some() {
            conditions.push("actor_user_id = $actor_user_id");
        }
        if filter.action.is_some() {
            conditions.push("action = $action");
        }
        if filter.entity_id.is_some() {
            conditions.push("entity_id = $entity_id");
        }
        let where_clause = conditions.join(" AND ");

        let count_query =
            format!("SELECT count() AS total FROM audit_log WHERE {where_clause} GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM audit_log \
             WHERE {where_clause} \
             ORDER BY timestamp DESC \
             LIMIT $limit START $offset"
        );

        let mut count_builder = self.db.query(&count_query);
        let mut list_builder = self
            .db
            .query(&list_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));

        if let Some(tid) = tenant_id {
            count_builder = count_builder.bind(("tenant_id", tid.to_string()));
            list_builder = list_builder.bind(("tenant_id", tid.to_string()));
        }
        if let Some(actor) = filter.actor_user_id {
            count_builder = count_builder.bind(("actor_user_id", actor.to_string()));
            list_builder = list_builder.bind(("actor_user_id", actor.to_string()));
        }
        if let Some(action) = filter.action {
            count_builder = count_builder.bind(("action", action.clone()));
            list_builder = list_builder.bind(("action", action));
        }
        if let Some(entity_id) = filter.entity_id {
            count_builder = count_builder.bind(("entity_id", entity_id.to_string()));
            list_builder = list_builder.bind(("entity_id", entity_id.to_string()));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = list_builder.await.map_err(DbError::from)?;
        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

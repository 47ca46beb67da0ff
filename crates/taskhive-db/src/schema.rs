//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. The audit_log table is
//! append-only at the permission level.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD status ON TABLE tenant TYPE string DEFAULT 'active' \
    ASSERT $value IN ['active', 'suspended'];
DEFINE FIELD subscription_plan ON TABLE tenant TYPE string \
    ASSERT $value IN ['free', 'pro', 'enterprise'];
DEFINE FIELD max_users ON TABLE tenant TYPE int;
DEFINE FIELD max_projects ON TABLE tenant TYPE int;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Users (tenant scope)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['user', 'tenant_admin'];
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_tenant_email ON TABLE user \
    COLUMNS tenant_id, email UNIQUE;
DEFINE INDEX idx_user_tenant_role ON TABLE user \
    COLUMNS tenant_id, role;

-- =======================================================================
-- Projects (tenant scope)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE project TYPE string;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE option<string>;
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_tenant ON TABLE project COLUMNS tenant_id;

-- =======================================================================
-- Tasks (tenant scope, per-project)
-- =======================================================================
DEFINE TABLE task SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE task TYPE string;
DEFINE FIELD project_id ON TABLE task TYPE string;
DEFINE FIELD title ON TABLE task TYPE string;
DEFINE FIELD description ON TABLE task TYPE option<string>;
DEFINE FIELD status ON TABLE task TYPE string DEFAULT 'todo' \
    ASSERT $value IN ['todo', 'in_progress', 'completed'];
DEFINE FIELD priority ON TABLE task TYPE string DEFAULT 'medium' \
    ASSERT $value IN ['low', 'medium', 'high'];
DEFINE FIELD assigned_to_id ON TABLE task TYPE option<string>;
DEFINE FIELD due_date ON TABLE task TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE task TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE task TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_task_tenant_project ON TABLE task \
    COLUMNS tenant_id, project_id;

-- =======================================================================
-- Audit Log (append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD tenant_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD actor_user_id ON TABLE audit_log TYPE string;
DEFINE FIELD action ON TABLE audit_log TYPE string \
    ASSERT $value IN ['CREATE_TASK', 'UPDATE_TASK', \
    'UPDATE_TASK_STATUS', 'DELETE_TASK', 'CREATE_USER', 'UPDATE_USER', \
    'DELETE_USER', 'UPDATE_TENANT', 'CREATE_PROJECT', 'DELETE_PROJECT'];
DEFINE FIELD entity_type ON TABLE audit_log TYPE string;
DEFINE FIELD entity_id ON TABLE audit_log TYPE string;
DEFINE FIELD ip_address ON TABLE audit_log TYPE option<string>;
DEFINE FIELD timestamp ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_tenant_time ON TABLE audit_log \
    COLUMNS tenant_id, timestamp;
DEFINE INDEX idx_audit_actor ON TABLE audit_log \
    COLUMNS actor_user_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn audit_table_is_append_only() {
        assert!(SCHEMA_V1.contains("FOR update NONE"));
        assert!(SCHEMA_V1.contains("FOR delete NONE"));
    }
}

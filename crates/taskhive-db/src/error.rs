//! Database-specific error types and conversions.

use taskhive_core::error::TaskHiveError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Unique-index violation on `(tenant_id, email)`, the store-side
    /// backstop for the check-then-create race.
    #[error("Email already exists in tenant: {email}")]
    DuplicateEmail { email: String },
}

impl From<DbError> for TaskHiveError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TaskHiveError::NotFound { entity, id },
            DbError::DuplicateEmail { email } => TaskHiveError::DuplicateEmail { email },
            other => TaskHiveError::Database(other.to_string()),
        }
    }
}

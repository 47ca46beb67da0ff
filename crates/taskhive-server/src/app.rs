//! Service construction.
//!
//! All repositories and the audit sink are injected at construction;
//! nothing downstream reaches for an ambient handle.

use surrealdb::{Connection, Surreal};
use taskhive_authz::audit::AuditSink;
use taskhive_authz::service::{ProjectService, TaskService, TenantService, UserService};
use taskhive_db::repository::{
    SurrealAuditLogRepository, SurrealProjectRepository, SurrealTaskRepository,
    SurrealTenantRepository, SurrealUserRepository,
};

/// The constructed operation services, ready for a transport layer to
/// dispatch into.
pub struct AppServices<C: Connection> {
    pub tenants: TenantService<SurrealTenantRepository<C>, SurrealAuditLogRepository<C>>,
    pub users: UserService<SurrealUserRepository<C>, SurrealAuditLogRepository<C>>,
    pub projects: ProjectService<SurrealProjectRepository<C>, SurrealAuditLogRepository<C>>,
    pub tasks: TaskService<
        SurrealTaskRepository<C>,
        SurrealProjectRepository<C>,
        SurrealUserRepository<C>,
        SurrealAuditLogRepository<C>,
    >,
}

/// Wire repositories and services onto one database handle.
pub fn build_services<C: Connection>(db: Surreal<C>) -> AppServices<C> {
    AppServices {
        tenants: TenantService::new(
            SurrealTenantRepository::new(db.clone()),
            AuditSink::new(SurrealAuditLogRepository::new(db.clone())),
        ),
        users: UserService::new(
            SurrealUserRepository::new(db.clone()),
            AuditSink::new(SurrealAuditLogRepository::new(db.clone())),
        ),
        projects: ProjectService::new(
            SurrealProjectRepository::new(db.clone()),
            AuditSink::new(SurrealAuditLogRepository::new(db.clone())),
        ),
        tasks: TaskService::new(
            SurrealTaskRepository::new(db.clone()),
            SurrealProjectRepository::new(db.clone()),
            SurrealUserRepository::new(db.clone()),
            AuditSink::new(SurrealAuditLogRepository::new(db)),
        ),
    }
}

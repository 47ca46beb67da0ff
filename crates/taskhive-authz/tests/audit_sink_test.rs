//! Audit failure semantics: a broken audit store must never fail the
//! primary operation, and the failure must surface on the `audit`
//! operational log target.

use std::sync::{Arc, Mutex};

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use taskhive_authz::audit::AuditSink;
use taskhive_authz::service::{NewProject, NewUser, ProjectService, UserService};
use taskhive_core::error::{TaskHiveError, TaskHiveResult};
use taskhive_core::models::audit::{AuditLogEntry, CreateAuditLogEntry};
use taskhive_core::models::principal::{Principal, RequestMeta, Role};
use taskhive_core::models::user::CreateUser;
use taskhive_core::repository::{
    AuditLogFilter, AuditLogRepository, PaginatedResult, Pagination, UserRepository,
};
use taskhive_db::repository::{
    SurrealAuditLogRepository, SurrealProjectRepository, SurrealUserRepository,
};
use tracing_subscriber::layer::SubscriberExt;
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    taskhive_db::run_migrations(&db).await.unwrap();
    db
}

/// An audit repository whose store is permanently down.
#[derive(Clone)]
struct FailingAuditRepository;

impl AuditLogRepository for FailingAuditRepository {
    async fn append(&self, _input: CreateAuditLogEntry) -> TaskHiveResult<AuditLogEntry> {
        Err(TaskHiveError::Database("audit store unavailable".into()))
    }

    async fn list(
        &self,
        _tenant_id: Option<Uuid>,
        _filter: AuditLogFilter,
        _pagination: Pagination,
    ) -> TaskHiveResult<PaginatedResult<AuditLogEntry>> {
        Err(TaskHiveError::Database("audit store unavailable".into()))
    }
}

/// Captures event targets emitted while the guard is alive.
struct TargetLayer {
    targets: Arc<Mutex<Vec<String>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for TargetLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.targets
            .lock()
            .unwrap()
            .push(event.metadata().target().to_string());
    }
}

fn meta() -> RequestMeta {
    RequestMeta { ip_address: None }
}

#[tokio::test]
async fn audit_failure_never_fails_the_primary_operation() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let admin_row = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            tenant_id,
            email: "admin@acme.com".into(),
            password: "correct-horse-battery".into(),
            full_name: "Admin".into(),
            role: Role::TenantAdmin,
        })
        .await
        .unwrap();
    let admin = Principal::new(admin_row.id, Role::TenantAdmin, Some(tenant_id));

    let svc = UserService::new(
        SurrealUserRepository::new(db.clone()),
        AuditSink::new(FailingAuditRepository),
    );

    let targets = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(TargetLayer {
        targets: Arc::clone(&targets),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    // The mutation succeeds although every audit append fails.
    let bob = svc
        .create_user(
            &admin,
            &meta(),
            NewUser {
                email: "bob@acme.com".into(),
                password: "correct-horse-battery".into(),
                full_name: "Bob".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();

    // The row really exists.
    let fetched = SurrealUserRepository::new(db.clone())
        .get_by_id(tenant_id, bob.id)
        .await
        .unwrap();
    assert_eq!(fetched.email, "bob@acme.com");

    // The failure went to the operational channel.
    let seen = targets.lock().unwrap();
    assert!(
        seen.iter().any(|t| t == "audit"),
        "expected a warning on the 'audit' target, got: {seen:?}"
    );
}

#[tokio::test]
async fn delete_also_survives_a_dead_audit_store() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let users = SurrealUserRepository::new(db.clone());
    let admin_row = users
        .create(CreateUser {
            tenant_id,
            email: "admin@acme.com".into(),
            password: "correct-horse-battery".into(),
            full_name: "Admin".into(),
            role: Role::TenantAdmin,
        })
        .await
        .unwrap();
    let bob_row = users
        .create(CreateUser {
            tenant_id,
            email: "bob@acme.com".into(),
            password: "correct-horse-battery".into(),
            full_name: "Bob".into(),
            role: Role::User,
        })
        .await
        .unwrap();

    let svc = UserService::new(
        SurrealUserRepository::new(db.clone()),
        AuditSink::new(FailingAuditRepository),
    );
    let admin = Principal::new(admin_row.id, Role::TenantAdmin, Some(tenant_id));

    svc.delete_user(&admin, &meta(), bob_row.id).await.unwrap();
    assert!(matches!(
        users.get_by_id(tenant_id, bob_row.id).await.unwrap_err(),
        TaskHiveError::NotFound { .. }
    ));
}

#[tokio::test]
async fn each_successful_mutation_appends_exactly_one_record() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let admin = Principal::new(Uuid::new_v4(), Role::TenantAdmin, Some(tenant_id));

    let svc = ProjectService::new(
        SurrealProjectRepository::new(db.clone()),
        AuditSink::new(SurrealAuditLogRepository::new(db.clone())),
    );

    let project = svc
        .create_project(
            &admin,
            &meta(),
            NewProject {
                name: "Solo".into(),
                description: None,
            },
        )
        .await
        .unwrap();

    let entries = SurrealAuditLogRepository::new(db.clone())
        .list(
            Some(tenant_id),
            AuditLogFilter {
                entity_id: Some(project.id),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(entries.total, 1);
}

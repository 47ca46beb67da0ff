//! Integration tests for tenant self-service and platform
//! administration.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use taskhive_authz::audit::AuditSink;
use taskhive_authz::service::TenantService;
use taskhive_core::error::TaskHiveError;
use taskhive_core::models::principal::{Principal, RequestMeta, Role};
use taskhive_core::models::tenant::{CreateTenant, Tenant, TenantStatus, UpdateTenant};
use taskhive_core::plan::SubscriptionPlan;
use taskhive_core::repository::{
    AuditLogFilter, AuditLogRepository, Pagination, TenantRepository,
};
use taskhive_db::repository::{SurrealAuditLogRepository, SurrealTenantRepository};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    taskhive_db::run_migrations(&db).await.unwrap();
    db
}

fn service(
    db: &Surreal<Db>,
) -> TenantService<SurrealTenantRepository<Db>, SurrealAuditLogRepository<Db>> {
    TenantService::new(
        SurrealTenantRepository::new(db.clone()),
        AuditSink::new(SurrealAuditLogRepository::new(db.clone())),
    )
}

async fn seed_tenant(db: &Surreal<Db>, name: &str, plan: SubscriptionPlan) -> Tenant {
    SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: name.into(),
            subscription_plan: plan,
        })
        .await
        .unwrap()
}

fn meta() -> RequestMeta {
    RequestMeta { ip_address: None }
}

fn root() -> Principal {
    Principal::new(Uuid::new_v4(), Role::SuperAdmin, None)
}

#[tokio::test]
async fn member_reads_only_its_own_tenant() {
    let db = setup().await;
    let acme = seed_tenant(&db, "ACME", SubscriptionPlan::Free).await;
    let globex = seed_tenant(&db, "Globex", SubscriptionPlan::Pro).await;
    let svc = service(&db);

    let member = Principal::new(Uuid::new_v4(), Role::User, Some(acme.id));
    let fetched = svc.get_my_tenant(&member).await.unwrap();
    assert_eq!(fetched.id, acme.id);
    assert_ne!(fetched.id, globex.id);
}

#[tokio::test]
async fn update_my_tenant_changes_name_and_is_audited() {
    let db = setup().await;
    let acme = seed_tenant(&db, "ACME", SubscriptionPlan::Pro).await;
    let svc = service(&db);

    let admin = Principal::new(Uuid::new_v4(), Role::TenantAdmin, Some(acme.id));
    let updated = svc
        .update_my_tenant(
            &admin,
            &meta(),
            UpdateTenant {
                name: Some("ACME Industries".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "ACME Industries");
    // Plan and quotas are unreachable from the self-service path.
    assert_eq!(updated.subscription_plan, SubscriptionPlan::Pro);
    assert_eq!(updated.max_users, 25);
    assert_eq!(updated.max_projects, 15);

    let audited = SurrealAuditLogRepository::new(db.clone())
        .list(
            Some(acme.id),
            AuditLogFilter {
                action: Some("UPDATE_TENANT".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(audited.total, 1);
    assert_eq!(audited.items[0].entity_id, acme.id);
}

#[tokio::test]
async fn super_admin_has_no_tenant_of_its_own() {
    let db = setup().await;
    seed_tenant(&db, "ACME", SubscriptionPlan::Free).await;
    let svc = service(&db);

    let err = svc.get_my_tenant(&root()).await.unwrap_err();
    assert!(matches!(err, TaskHiveError::MissingTenantContext));
}

#[tokio::test]
async fn listing_all_tenants_requires_super_admin() {
    let db = setup().await;
    seed_tenant(&db, "ACME", SubscriptionPlan::Free).await;
    seed_tenant(&db, "Globex", SubscriptionPlan::Pro).await;
    let svc = service(&db);

    let page = svc.list_tenants(&root(), Pagination::default()).await.unwrap();
    assert_eq!(page.total, 2);

    let admin = Principal::new(Uuid::new_v4(), Role::TenantAdmin, Some(Uuid::new_v4()));
    let err = svc
        .list_tenants(&admin, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::InsufficientRole { .. }));
}

#[tokio::test]
async fn plan_change_sets_quotas_atomically_and_is_audited_unscoped() {
    let db = setup().await;
    let acme = seed_tenant(&db, "ACME", SubscriptionPlan::Free).await;
    let svc = service(&db);

    let updated = svc
        .update_tenant_plan(&root(), &meta(), acme.id, "enterprise")
        .await
        .unwrap();
    assert_eq!(updated.subscription_plan, SubscriptionPlan::Enterprise);
    assert_eq!(updated.max_users, 100);
    assert_eq!(updated.max_projects, 50);

    // Platform-admin actions are recorded without a tenant context.
    let platform_entries = SurrealAuditLogRepository::new(db.clone())
        .list(None, AuditLogFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(platform_entries.total, 1);
    assert_eq!(platform_entries.items[0].tenant_id, None);
    assert_eq!(platform_entries.items[0].entity_id, acme.id);
}

#[tokio::test]
async fn unknown_plan_performs_no_write() {
    let db = setup().await;
    let acme = seed_tenant(&db, "ACME", SubscriptionPlan::Pro).await;
    let svc = service(&db);

    let err = svc
        .update_tenant_plan(&root(), &meta(), acme.id, "platinum")
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::InvalidPlan { .. }));

    // Plan and both quota fields are untouched.
    let unchanged = SurrealTenantRepository::new(db.clone())
        .get_by_id(acme.id)
        .await
        .unwrap();
    assert_eq!(unchanged.subscription_plan, SubscriptionPlan::Pro);
    assert_eq!(unchanged.max_users, 25);
    assert_eq!(unchanged.max_projects, 15);

    // And nothing was audited.
    let entries = SurrealAuditLogRepository::new(db.clone())
        .list(None, AuditLogFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(entries.total, 0);
}

#[tokio::test]
async fn plan_change_requires_super_admin() {
    let db = setup().await;
    let acme = seed_tenant(&db, "ACME", SubscriptionPlan::Free).await;
    let svc = service(&db);

    let admin = Principal::new(Uuid::new_v4(), Role::TenantAdmin, Some(acme.id));
    let err = svc
        .update_tenant_plan(&admin, &meta(), acme.id, "pro")
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::InsufficientRole { .. }));
}

#[tokio::test]
async fn status_change_validates_the_value() {
    let db = setup().await;
    let acme = seed_tenant(&db, "ACME", SubscriptionPlan::Free).await;
    let svc = service(&db);

    let err = svc
        .update_tenant_status(&root(), &meta(), acme.id, "dormant")
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::Validation { .. }));

    let updated = svc
        .update_tenant_status(&root(), &meta(), acme.id, "suspended")
        .await
        .unwrap();
    assert_eq!(updated.status, TenantStatus::Suspended);
}

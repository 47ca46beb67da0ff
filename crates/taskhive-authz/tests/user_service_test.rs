//! Integration tests for user operations: per-tenant email uniqueness
//! and the deletion guards.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use taskhive_authz::audit::AuditSink;
use taskhive_authz::service::{NewUser, UserService};
use taskhive_core::error::TaskHiveError;
use taskhive_core::models::audit::AuditAction;
use taskhive_core::models::principal::{Principal, RequestMeta, Role};
use taskhive_core::models::user::{UpdateUser, User};
use taskhive_core::repository::{
    AuditLogFilter, AuditLogRepository, Pagination, UserRepository,
};
use taskhive_db::repository::{SurrealAuditLogRepository, SurrealUserRepository};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    taskhive_db::run_migrations(&db).await.unwrap();
    db
}

fn service(db: &Surreal<Db>) -> UserService<SurrealUserRepository<Db>, SurrealAuditLogRepository<Db>> {
    UserService::new(
        SurrealUserRepository::new(db.clone()),
        AuditSink::new(SurrealAuditLogRepository::new(db.clone())),
    )
}

fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        email: email.into(),
        password: "correct-horse-battery".into(),
        full_name: "Someone".into(),
        role,
    }
}

fn meta() -> RequestMeta {
    RequestMeta { ip_address: None }
}

/// Seed an admin directly through the repository and return a
/// principal for them.
async fn seed_admin(db: &Surreal<Db>, tenant_id: Uuid, email: &str) -> (User, Principal) {
    let user = SurrealUserRepository::new(db.clone())
        .create(taskhive_core::models::user::CreateUser {
            tenant_id,
            email: email.into(),
            password: "correct-horse-battery".into(),
            full_name: "Admin".into(),
            role: Role::TenantAdmin,
        })
        .await
        .unwrap();
    let principal = Principal::new(user.id, Role::TenantAdmin, Some(tenant_id));
    (user, principal)
}

#[tokio::test]
async fn duplicate_email_in_same_tenant_conflicts() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let (_, admin) = seed_admin(&db, tenant_id, "admin@acme.com").await;
    let svc = service(&db);

    svc.create_user(&admin, &meta(), new_user("bob@acme.com", Role::User))
        .await
        .unwrap();

    let err = svc
        .create_user(&admin, &meta(), new_user("bob@acme.com", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::DuplicateEmail { .. }));
}

#[tokio::test]
async fn same_email_is_fine_in_another_tenant() {
    let db = setup().await;
    let tenant_a = Uuid::new_v4();
    let tenant_b = Uuid::new_v4();
    let (_, admin_a) = seed_admin(&db, tenant_a, "admin@a.com").await;
    let (_, admin_b) = seed_admin(&db, tenant_b, "admin@b.com").await;
    let svc = service(&db);

    svc.create_user(&admin_a, &meta(), new_user("shared@example.com", Role::User))
        .await
        .unwrap();

    let result = svc
        .create_user(&admin_b, &meta(), new_user("shared@example.com", Role::User))
        .await;
    assert!(result.is_ok(), "uniqueness is tenant-scoped, not global");
}

#[tokio::test]
async fn alice_and_bob_deletion_scenario() {
    let db = setup().await;
    let acme = Uuid::new_v4();
    let (alice, alice_principal) = seed_admin(&db, acme, "alice@acme.com").await;
    let svc = service(&db);

    let bob = svc
        .create_user(&alice_principal, &meta(), new_user("bob@acme.com", Role::User))
        .await
        .unwrap();

    // Alice cannot delete herself.
    let err = svc
        .delete_user(&alice_principal, &meta(), alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::CannotDeleteSelf));

    // Deleting bob succeeds and is audited under acme.
    svc.delete_user(&alice_principal, &meta(), bob.id)
        .await
        .unwrap();
    let deletions = SurrealAuditLogRepository::new(db.clone())
        .list(
            Some(acme),
            AuditLogFilter {
                action: Some("DELETE_USER".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(deletions.total, 1);
    assert_eq!(deletions.items[0].action, AuditAction::DeleteUser);
    assert_eq!(deletions.items[0].entity_id, bob.id);
    assert_eq!(deletions.items[0].tenant_id, Some(acme));

    // Recreate bob and promote him to admin; alice deleting herself is
    // still denied, since the self guard fires before the admin count
    // would even matter.
    let bob2 = svc
        .create_user(
            &alice_principal,
            &meta(),
            new_user("bob@acme.com", Role::User),
        )
        .await
        .unwrap();
    svc.update_user(
        &alice_principal,
        &meta(),
        bob2.id,
        UpdateUser {
            role: Some(Role::TenantAdmin),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = svc
        .delete_user(&alice_principal, &meta(), alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::CannotDeleteSelf));
}

#[tokio::test]
async fn sole_admin_cannot_be_deleted() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let (charlie, _) = seed_admin(&db, tenant_id, "charlie@solo.com").await;
    let svc = service(&db);

    // The acting principal is a trusted external identity, not a row
    // in the user table, so it does not inflate the admin count.
    let actor = Principal::new(Uuid::new_v4(), Role::TenantAdmin, Some(tenant_id));
    let err = svc
        .delete_user(&actor, &meta(), charlie.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::TenantRequiresAdmin));
}

#[tokio::test]
async fn deleting_one_of_two_admins_leaves_one() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let (_, alice_principal) = seed_admin(&db, tenant_id, "alice@acme.com").await;
    let svc = service(&db);

    let dave = svc
        .create_user(
            &alice_principal,
            &meta(),
            new_user("dave@acme.com", Role::TenantAdmin),
        )
        .await
        .unwrap();

    svc.delete_user(&alice_principal, &meta(), dave.id)
        .await
        .unwrap();

    let remaining = SurrealUserRepository::new(db.clone())
        .count_by_role(tenant_id, Role::TenantAdmin)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn platform_role_is_never_assignable() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let (_, admin) = seed_admin(&db, tenant_id, "admin@acme.com").await;
    let svc = service(&db);

    let err = svc
        .create_user(&admin, &meta(), new_user("evil@acme.com", Role::SuperAdmin))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::Validation { .. }));

    let bob = svc
        .create_user(&admin, &meta(), new_user("bob@acme.com", Role::User))
        .await
        .unwrap();
    let err = svc
        .update_user(
            &admin,
            &meta(),
            bob.id,
            UpdateUser {
                role: Some(Role::SuperAdmin),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::Validation { .. }));
}

#[tokio::test]
async fn plain_user_cannot_manage_users() {
    let db = setup().await;
    let tenant_id = Uuid::new_v4();
    let svc = service(&db);

    let plain = Principal::new(Uuid::new_v4(), Role::User, Some(tenant_id));

    let err = svc
        .create_user(&plain, &meta(), new_user("x@acme.com", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::InsufficientRole { .. }));

    let err = svc
        .list_users(&plain, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::InsufficientRole { .. }));
}

#[tokio::test]
async fn super_admin_cannot_manage_tenant_users() {
    let db = setup().await;
    let svc = service(&db);

    let root = Principal::new(Uuid::new_v4(), Role::SuperAdmin, None);
    let err = svc
        .create_user(&root, &meta(), new_user("x@acme.com", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskHiveError::MissingTenantContext));
}

#[tokio::test]
async fn listing_users_is_tenant_scoped() {
    let db = setup().await;
    let tenant_a = Uuid::new_v4();
    let tenant_b = Uuid::new_v4();
    let (_, admin_a) = seed_admin(&db, tenant_a, "admin@a.com").await;
    let (_, admin_b) = seed_admin(&db, tenant_b, "admin@b.com").await;
    let svc = service(&db);

    svc.create_user(&admin_a, &meta(), new_user("one@a.com", Role::User))
        .await
        .unwrap();
    svc.create_user(&admin_a, &meta(), new_user("two@a.com", Role::User))
        .await
        .unwrap();

    let page_a = svc.list_users(&admin_a, Pagination::default()).await.unwrap();
    assert_eq!(page_a.total, 3); // admin + two members

    let page_b = svc.list_users(&admin_b, Pagination::default()).await.unwrap();
    assert_eq!(page_b.total, 1); // only its own admin
    assert!(page_b.items.iter().all(|u| u.tenant_id == tenant_b));
}

//! Seeding of the baseline records and the default role behaviour it sets up

use auth_identity::{CredentialHasher, IdentityConfig, NewUser, UserStore};
use auth_rbac::seed::defaults::*;
use auth_rbac::{
    AuthzService, BundleStore, GroupStore, InMemoryAuthzStore, OperationStore, RbacConfig, RoleStore,
    SeedBootstrapper, SeedStep, StepStatus,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn hasher() -> CredentialHasher {
    CredentialHasher::new(&IdentityConfig {
        bcrypt_cost: 4,
        token_bytes: 16,
    })
    .unwrap()
}

fn service(store: &Arc<InMemoryAuthzStore>) -> AuthzService {
    AuthzService::new(store.clone(), &RbacConfig::default()).unwrap()
}

async fn seeded() -> (Arc<InMemoryAuthzStore>, AuthzService) {
    let store = Arc::new(InMemoryAuthzStore::new());
    let authz = service(&store);
    let report = SeedBootstrapper::new(authz.clone(), hasher()).run().await.clone();
    assert!(report.is_complete(), "{report:?}");
    (store, authz)
}

async fn member(store: &InMemoryAuthzStore, authz: &AuthzService, name: &str) -> i64 {
    let user = store
        .insert_user_if_absent(NewUser {
            username: name.to_string(),
            display_name: name.to_string(),
            token: String::new(),
            password_hash: String::new(),
        })
        .await
        .unwrap();
    let root = authz.groups().find(ROOT_GROUP, 0).await.unwrap().unwrap();
    let role = authz.roles().find(root.id, MEMBER_ROLE).await.unwrap().unwrap();
    authz.bundles().bundle(root.id, role.id, &[name.to_string()]).await.unwrap();
    user.id
}

#[tokio::test]
async fn test_fresh_store_gets_baseline_records() {
    let (store, authz) = seeded().await;

    assert_eq!(store.count_groups().await.unwrap(), 1);
    assert_eq!(store.count_users().await.unwrap(), 1);

    let root = authz.groups().find(ROOT_GROUP, 0).await.unwrap().unwrap();
    assert_eq!(root.level, ROOT_GROUP_LEVEL);
    assert!(root.is_root());

    let admin = store.find_user_by_name(ADMIN_USER).await.unwrap().unwrap();
    assert!(hasher().verify_password(ADMIN_DEFAULT_PASSWORD, &admin.password_hash).unwrap());
    assert_eq!(admin.token.len(), 32);
    assert_eq!(authz.groups().members(root.id).await.unwrap(), vec![admin.id]);

    let roles: Vec<String> = authz
        .roles()
        .list(root.id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    for name in [ADMIN_ROLE, DEV_ADMIN_ROLE, MEMBER_ROLE] {
        assert!(roles.iter().any(|r| r == name), "missing role {name}");
    }
}

#[tokio::test]
async fn test_reseeding_creates_nothing_new() {
    let (store, authz) = seeded().await;
    let counts = (
        store.count_groups().await.unwrap(),
        store.count_users().await.unwrap(),
        store.count_roles().await.unwrap(),
        store.count_bindings().await.unwrap(),
        store.list_operations().await.unwrap().len(),
    );
    let admin_before = store.find_user_by_name(ADMIN_USER).await.unwrap().unwrap();

    let report = SeedBootstrapper::new(authz, hasher()).run().await.clone();
    assert!(report.is_complete());

    assert_eq!(
        counts,
        (
            store.count_groups().await.unwrap(),
            store.count_users().await.unwrap(),
            store.count_roles().await.unwrap(),
            store.count_bindings().await.unwrap(),
            store.list_operations().await.unwrap().len(),
        )
    );
    let admin_after = store.find_user_by_name(ADMIN_USER).await.unwrap().unwrap();
    assert_eq!(admin_before.password_hash, admin_after.password_hash);
    assert_eq!(admin_before.token, admin_after.token);
}

#[tokio::test]
async fn test_admin_is_allowed_everything() {
    let (store, authz) = seeded().await;
    let admin = store.find_user_by_name(ADMIN_USER).await.unwrap().unwrap();

    assert!(authz.engine().is_allowed(admin.id, "project", "ProjectList").await.unwrap());
    assert!(authz.engine().is_allowed(admin.id, "never", "Registered").await.unwrap());
}

#[tokio::test]
async fn test_member_role_follows_the_allow_list() {
    let (store, authz) = seeded().await;
    let alice = member(&store, &authz, "alice").await;
    let engine = authz.engine();

    assert!(engine.is_allowed(alice, "project", "ProjectList").await.unwrap());
    assert!(engine.is_allowed(alice, "app-service", "AppServiceTerminal").await.unwrap());
    assert!(!engine.is_allowed(alice, "app-service", "DeleteEverything").await.unwrap());
    assert!(!engine.is_allowed(alice, "project", "DeleteProject").await.unwrap());
    assert!(!engine.is_allowed(alice, "auth", "CreateUser").await.unwrap());

    let granted = engine.effective_permissions(alice).await.unwrap();
    assert_eq!(granted.len(), MEMBER_OPERATIONS.len());
}

#[tokio::test]
async fn test_dev_admin_role_covers_its_categories() {
    let (store, authz) = seeded().await;
    let root = authz.groups().find(ROOT_GROUP, 0).await.unwrap().unwrap();
    let role = authz.roles().find(root.id, DEV_ADMIN_ROLE).await.unwrap().unwrap();

    let expected: BTreeSet<i64> = authz
        .catalog()
        .list()
        .await
        .unwrap()
        .iter()
        .filter(|op| DEV_ADMIN_CATEGORIES.contains(&op.resource_type.as_str()))
        .map(|op| op.id)
        .collect();
    assert_eq!(role.operations, expected);

    store
        .insert_user_if_absent(NewUser {
            username: "lead".to_string(),
            display_name: "lead".to_string(),
            token: String::new(),
            password_hash: String::new(),
        })
        .await
        .unwrap();
    authz.bundles().bundle(root.id, role.id, &["lead".to_string()]).await.unwrap();
    let decision = authz.engine().authorize_user("lead", "auth", "CreateUser").await;
    assert!(decision.is_allowed());
    let decision = authz.engine().authorize_user("lead", "app-service", "AppServiceTerminal").await;
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn test_admin_edits_survive_reseed() {
    let (store, authz) = seeded().await;
    let alice = member(&store, &authz, "alice").await;
    let root = authz.groups().find(ROOT_GROUP, 0).await.unwrap().unwrap();
    let role = authz.roles().find(root.id, MEMBER_ROLE).await.unwrap().unwrap();

    let list = authz.catalog().lookup("project", "ProjectList").await.unwrap();
    authz.roles().set_operations(role.id, [list]).await.unwrap();

    SeedBootstrapper::new(service(&store), hasher()).run().await;

    let engine = authz.engine();
    assert!(engine.is_allowed(alice, "project", "ProjectList").await.unwrap());
    assert!(!engine.is_allowed(alice, "pipeline", "PipelineCreate").await.unwrap());
}

#[tokio::test]
async fn test_existing_admin_account_is_reused() {
    let store = Arc::new(InMemoryAuthzStore::new());
    let custom_hash = hasher().hash_password("changed-by-operator").unwrap();
    let existing = store
        .insert_user_if_absent(NewUser {
            username: ADMIN_USER.to_string(),
            display_name: "Operator".to_string(),
            token: "operator-token".to_string(),
            password_hash: custom_hash.clone(),
        })
        .await
        .unwrap();

    let report = SeedBootstrapper::new(service(&store), hasher()).run().await.clone();
    assert_eq!(report.status_of(SeedStep::AdminUser), Some(&StepStatus::Completed));
    assert_eq!(report.status_of(SeedStep::AdminBundle), Some(&StepStatus::Completed));

    let admin = store.find_user_by_name(ADMIN_USER).await.unwrap().unwrap();
    assert_eq!(admin.id, existing.id);
    assert_eq!(admin.password_hash, custom_hash);
    assert_eq!(admin.token, "operator-token");
}

#[tokio::test]
async fn test_unreachable_store_is_reported_not_fatal() {
    let store = Arc::new(InMemoryAuthzStore::new());
    store.set_offline(true);

    let report = SeedBootstrapper::new(service(&store), hasher()).run().await.clone();
    assert!(!report.is_complete());
    assert_eq!(report.failures().count(), report.steps.len());

    store.set_offline(false);
    let report = SeedBootstrapper::new(service(&store), hasher()).run().await.clone();
    assert!(report.is_complete(), "{report:?}");
}

//! Resolution behaviour across catalog, groups, roles and bundles
//!
//! Every test runs against the in-memory store through the public service API.

use auth_identity::{NewUser, UserStore};
use auth_rbac::{AuthzError, AuthzService, BundleStore, Decision, InMemoryAuthzStore, RbacConfig};
use proptest::prelude::*;
use std::sync::Arc;

struct Harness {
    store: Arc<InMemoryAuthzStore>,
    authz: AuthzService,
    root: i64,
}

async fn harness() -> Harness {
    let store = Arc::new(InMemoryAuthzStore::new());
    let authz = AuthzService::new(store.clone(), &RbacConfig::default()).unwrap();
    let root = authz.groups().create_group("system", 0, "system", "").await.unwrap();
    Harness { store, authz, root }
}

impl Harness {
    async fn user(&self, name: &str) -> i64 {
        self.store
            .insert_user_if_absent(NewUser {
                username: name.to_string(),
                display_name: name.to_string(),
                token: String::new(),
                password_hash: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    async fn role(&self, group: i64, name: &str, pairs: &[(&str, &str)]) -> i64 {
        let ids = self.authz.catalog().register_all(pairs).await.unwrap();
        self.authz.roles().create_role(group, name, "", ids).await.unwrap()
    }

    async fn bundle(&self, group: i64, role: i64, users: &[&str]) -> auth_rbac::Result<()> {
        let names: Vec<String> = users.iter().map(|u| u.to_string()).collect();
        self.authz.bundles().bundle(group, role, &names).await
    }

    async fn allowed(&self, user: i64, resource_type: &str, operation_name: &str) -> bool {
        self.authz
            .engine()
            .is_allowed(user, resource_type, operation_name)
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_catalog_registration_is_idempotent() {
    let h = harness().await;
    let first = h.authz.catalog().register("pipeline", "PipelineCreate").await.unwrap();
    let second = h.authz.catalog().register("pipeline", "PipelineCreate").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.authz.catalog().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_without_bundles_is_denied() {
    let h = harness().await;
    let alice = h.user("alice").await;
    h.role(h.root, "admin", &[("*", "*")]).await;

    assert!(!h.allowed(alice, "project", "ProjectList").await);
    assert!(!h.allowed(alice, "*", "*").await);
}

#[tokio::test]
async fn test_wildcard_role_allows_unregistered_pairs() {
    let h = harness().await;
    let admin = h.user("admin").await;
    let role = h.role(h.root, "admin", &[("*", "*")]).await;
    h.bundle(h.root, role, &["admin"]).await.unwrap();

    assert!(h.allowed(admin, "anything", "AtAll").await);
    assert!(h
        .authz
        .catalog()
        .lookup("anything", "AtAll")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_grants_are_a_union_over_held_roles() {
    let h = harness().await;
    let alice = h.user("alice").await;
    let team = h.authz.groups().create_group("team", h.root, "team", "").await.unwrap();

    let viewer = h.role(h.root, "viewer", &[("project", "ProjectList")]).await;
    let builder = h.role(team, "builder", &[("pipeline", "PipelineCreate")]).await;
    h.bundle(h.root, viewer, &["alice"]).await.unwrap();
    h.bundle(team, builder, &["alice"]).await.unwrap();

    assert!(h.allowed(alice, "project", "ProjectList").await);
    assert!(h.allowed(alice, "pipeline", "PipelineCreate").await);
    assert!(!h.allowed(alice, "pipeline", "PipelineDelete").await);
}

#[tokio::test]
async fn test_operation_name_does_not_match_across_resource_types() {
    let h = harness().await;
    let alice = h.user("alice").await;
    let role = h.role(h.root, "builder", &[("pipeline", "PipelineCreate")]).await;
    h.bundle(h.root, role, &["alice"]).await.unwrap();

    assert!(h.allowed(alice, "pipeline", "PipelineCreate").await);
    assert!(!h.allowed(alice, "project", "PipelineCreate").await);
}

#[tokio::test]
async fn test_grants_do_not_cascade_to_descendant_groups() {
    let h = harness().await;
    let team = h.authz.groups().create_group("team", h.root, "team", "").await.unwrap();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;

    let lead = h.role(h.root, "lead", &[("publish", "ClosePublish")]).await;
    h.bundle(h.root, lead, &["alice"]).await.unwrap();
    h.authz.groups().add_member(team, bob).await.unwrap();

    assert!(h.allowed(alice, "publish", "ClosePublish").await);
    assert!(!h.allowed(bob, "publish", "ClosePublish").await);
}

#[tokio::test]
async fn test_group_membership_alone_grants_nothing() {
    let h = harness().await;
    let alice = h.user("alice").await;
    h.role(h.root, "admin", &[("*", "*")]).await;
    h.authz.groups().add_member(h.root, alice).await.unwrap();

    assert!(!h.allowed(alice, "project", "ProjectList").await);
}

#[tokio::test]
async fn test_unknown_user_leaves_store_untouched() {
    let h = harness().await;
    h.user("alice").await;
    let role = h.role(h.root, "developer", &[("project", "ProjectList")]).await;

    let err = h.bundle(h.root, role, &["alice", "ghost"]).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("ghost"));
    assert_eq!(h.store.count_bindings().await.unwrap(), 0);
}

#[tokio::test]
async fn test_revocation_applies_immediately() {
    let h = harness().await;
    let alice = h.user("alice").await;
    let role = h.role(h.root, "developer", &[("project", "ProjectList")]).await;
    h.bundle(h.root, role, &["alice"]).await.unwrap();

    // Populate the role cache first
    assert!(h.allowed(alice, "project", "ProjectList").await);

    h.authz.bundles().revoke(h.root, role, alice).await.unwrap();
    assert!(!h.allowed(alice, "project", "ProjectList").await);
}

#[tokio::test]
async fn test_role_edit_is_visible_through_cache() {
    let h = harness().await;
    let alice = h.user("alice").await;
    let role = h.role(h.root, "developer", &[("project", "ProjectList")]).await;
    h.bundle(h.root, role, &["alice"]).await.unwrap();
    assert!(!h.allowed(alice, "project", "DeleteProject").await);

    let delete = h.authz.catalog().register("project", "DeleteProject").await.unwrap();
    let mut ops = h.authz.roles().operations_of(role).await.unwrap();
    ops.insert(delete);
    h.authz.roles().set_operations(role, ops).await.unwrap();

    assert!(h.allowed(alice, "project", "DeleteProject").await);
}

#[tokio::test]
async fn test_storage_failure_denies() {
    let h = harness().await;
    let admin = h.user("admin").await;
    let role = h.role(h.root, "admin", &[("*", "*")]).await;
    h.bundle(h.root, role, &["admin"]).await.unwrap();

    h.store.set_offline(true);
    let err = h.authz.engine().is_allowed(admin, "project", "ProjectList").await.unwrap_err();
    assert!(err.is_storage());
    assert_eq!(
        h.authz.engine().authorize(admin, "project", "ProjectList").await,
        Decision::Deny
    );

    h.store.set_offline(false);
    assert_eq!(
        h.authz.engine().authorize(admin, "project", "ProjectList").await,
        Decision::Allow
    );
}

#[tokio::test]
async fn test_move_group_rejects_cycles() {
    let h = harness().await;
    let dept = h.authz.groups().create_group("dept", h.root, "dept", "").await.unwrap();
    let team = h.authz.groups().create_group("team", dept, "team", "").await.unwrap();

    let err = h.authz.groups().move_group(h.root, team).await.unwrap_err();
    assert!(matches!(err, AuthzError::ValidationError(_)));

    let chain: Vec<i64> = h
        .authz
        .groups()
        .ancestors(team)
        .await
        .unwrap()
        .iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(chain, vec![h.root, dept]);
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_unbundled_users_are_always_denied(resource_type in name_strategy(), operation_name in name_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let allowed = rt.block_on(async {
            let h = harness().await;
            let role = h.role(h.root, "admin", &[("*", "*")]).await;
            h.user("admin").await;
            h.bundle(h.root, role, &["admin"]).await.unwrap();

            let bystander = h.user("bystander").await;
            h.allowed(bystander, &resource_type, &operation_name).await
        });
        prop_assert!(!allowed);
    }

    #[test]
    fn prop_wildcard_holder_is_always_allowed(resource_type in name_strategy(), operation_name in name_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let allowed = rt.block_on(async {
            let h = harness().await;
            let role = h.role(h.root, "admin", &[("*", "*")]).await;
            let admin = h.user("admin").await;
            h.bundle(h.root, role, &["admin"]).await.unwrap();
            h.allowed(admin, &resource_type, &operation_name).await
        });
        prop_assert!(allowed);
    }

    #[test]
    fn prop_exact_grant_matches_only_its_pair(
        granted in name_strategy(),
        requested in name_strategy(),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let allowed = rt.block_on(async {
            let h = harness().await;
            let role = h.role(h.root, "narrow", &[("project", granted.as_str())]).await;
            let alice = h.user("alice").await;
            h.bundle(h.root, role, &["alice"]).await.unwrap();
            h.allowed(alice, "project", &requested).await
        });
        prop_assert_eq!(allowed, granted == requested);
    }
}

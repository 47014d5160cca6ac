//! Bundling: attaching users to a role within a group

use crate::{
    error::{AuthzError, Result},
    models::*,
    store::AuthzStore,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct BundlingService {
    store: Arc<dyn AuthzStore>,
}

impl BundlingService {
    pub fn new(store: Arc<dyn AuthzStore>) -> Self {
        Self { store }
    }

    /// Attach every named user to `(group_id, role_id)`.
    ///
    /// All names are resolved before anything is written. If any name is
    /// unknown the call fails with `NotFound` listing the unresolved names and
    /// the store is left untouched. Pairs a user already holds are no-ops.
    pub async fn bundle(&self, group_id: i64, role_id: i64, user_names: &[String]) -> Result<()> {
        let role = self
            .store
            .find_role(role_id)
            .await?
            .ok_or_else(|| AuthzError::not_found("role", role_id.to_string()))?;
        if role.group_id != group_id {
            return Err(AuthzError::ValidationError(format!(
                "role {} belongs to group {}, not {}",
                role_id, role.group_id, group_id
            )));
        }

        let names: BTreeSet<&str> = user_names.iter().map(String::as_str).collect();
        if names.is_empty() {
            return Ok(());
        }

        let lookup: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let users = self.store.find_users_by_names(&lookup).await?;

        let resolved: BTreeSet<&str> = users.iter().map(|u| u.username.as_str()).collect();
        let missing: Vec<&str> = names.difference(&resolved).copied().collect();
        if !missing.is_empty() {
            return Err(AuthzError::not_found("user", missing.join(",")));
        }

        let user_ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        self.store.bind_users(group_id, role_id, &user_ids).await?;

        info!(group_id, role = %role.name, users = user_ids.len(), "Users bundled to role");
        Ok(())
    }

    /// Every `(group, role)` pair the user holds, deduplicated.
    pub async fn roles_of(&self, user_id: i64) -> Result<BTreeSet<RoleBinding>> {
        let bindings: BTreeSet<RoleBinding> = self
            .store
            .bindings_for_user(user_id)
            .await?
            .into_iter()
            .collect();
        debug!(user_id, roles = bindings.len(), "Resolved role bindings");
        Ok(bindings)
    }

    /// Detach a user from a role. Revoking a pair that is not held succeeds.
    pub async fn revoke(&self, group_id: i64, role_id: i64, user_id: i64) -> Result<()> {
        if self.store.unbind_user(group_id, role_id, user_id).await? {
            info!(group_id, role_id, user_id, "Role binding revoked");
        }
        Ok(())
    }

    pub async fn members_of(&self, group_id: i64, role_id: i64) -> Result<Bundle> {
        self.store.bundle(group_id, role_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BundleStore, GroupStore, InMemoryAuthzStore, RoleStore};
    use auth_identity::{NewUser, UserStore};

    struct Fixture {
        store: Arc<InMemoryAuthzStore>,
        bundles: BundlingService,
        group_id: i64,
        role_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryAuthzStore::new());
        let group = store
            .insert_group_if_absent(NewGroup {
                name: "system".to_string(),
                parent_id: ROOT_PARENT_ID,
                level: "system".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        let (role, _) = store
            .insert_role_if_absent(NewRole {
                group_id: group.id,
                name: "developer".to_string(),
                description: String::new(),
                operations: BTreeSet::new(),
            })
            .await
            .unwrap();
        for name in ["alice", "bob"] {
            store
                .insert_user_if_absent(NewUser {
                    username: name.to_string(),
                    display_name: name.to_string(),
                    token: String::new(),
                    password_hash: String::new(),
                })
                .await
                .unwrap();
        }

        Fixture {
            bundles: BundlingService::new(store.clone()),
            store,
            group_id: group.id,
            role_id: role.id,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_rebundle_is_a_noop() {
        let f = fixture().await;
        let alice = f.store.find_user_by_name("alice").await.unwrap().unwrap();

        f.bundles.bundle(f.group_id, f.role_id, &names(&["alice", "alice"])).await.unwrap();
        f.bundles.bundle(f.group_id, f.role_id, &names(&["alice"])).await.unwrap();

        let roles = f.bundles.roles_of(alice.id).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert!(roles.contains(&RoleBinding {
            group_id: f.group_id,
            role_id: f.role_id
        }));
    }

    #[tokio::test]
    async fn test_unknown_user_fails_whole_batch() {
        let f = fixture().await;

        let err = f
            .bundles
            .bundle(f.group_id, f.role_id, &names(&["alice", "mallory", "bob"]))
            .await
            .unwrap_err();
        match err {
            AuthzError::NotFound { kind, key } => {
                assert_eq!(kind, "user");
                assert_eq!(key, "mallory");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(f.store.count_bindings().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_role_must_belong_to_group() {
        let f = fixture().await;
        let other = f
            .store
            .insert_group_if_absent(NewGroup {
                name: "team".to_string(),
                parent_id: f.group_id,
                level: "team".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        assert!(matches!(
            f.bundles.bundle(other.id, f.role_id, &names(&["alice"])).await,
            Err(AuthzError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_and_members() {
        let f = fixture().await;
        f.bundles.bundle(f.group_id, f.role_id, &names(&["alice", "bob"])).await.unwrap();

        let bob = f.store.find_user_by_name("bob").await.unwrap().unwrap();
        f.bundles.revoke(f.group_id, f.role_id, bob.id).await.unwrap();
        f.bundles.revoke(f.group_id, f.role_id, bob.id).await.unwrap();

        let bundle = f.bundles.members_of(f.group_id, f.role_id).await.unwrap();
        assert_eq!(bundle.user_ids.len(), 1);
        assert!(!bundle.user_ids.contains(&bob.id));
    }
}

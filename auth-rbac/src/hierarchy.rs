//! Group tree: creation, traversal, re-parenting and plain membership

use crate::{
    error::{AuthzError, Result},
    models::*,
    store::AuthzStore,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct GroupHierarchy {
    store: Arc<dyn AuthzStore>,
    max_depth: usize,
}

impl GroupHierarchy {
    pub fn new(store: Arc<dyn AuthzStore>, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    /// Create-or-get keyed by `(name, parent_id)`.
    ///
    /// A non-root parent must exist and sit on a well-formed chain.
    pub async fn create_group(
        &self,
        name: &str,
        parent_id: i64,
        level: &str,
        description: &str,
    ) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(AuthzError::ValidationError("group name must not be empty".to_string()));
        }

        if parent_id != ROOT_PARENT_ID {
            // A new group has no descendants, so the only cycle risk is a
            // broken chain above the parent.
            let chain = self.ancestors(parent_id).await?;
            if chain.len() + 1 >= self.max_depth {
                return Err(AuthzError::ValidationError(format!(
                    "group '{}' would exceed the maximum depth of {}",
                    name, self.max_depth
                )));
            }
        }

        let group = self
            .store
            .insert_group_if_absent(NewGroup {
                name: name.to_string(),
                parent_id,
                level: level.to_string(),
                description: description.to_string(),
            })
            .await?;

        debug!(group = %group, parent_id, "Group ensured");
        Ok(group.id)
    }

    pub async fn get(&self, group_id: i64) -> Result<Group> {
        self.store
            .find_group(group_id)
            .await?
            .ok_or_else(|| AuthzError::not_found("group", group_id.to_string()))
    }

    pub async fn find(&self, name: &str, parent_id: i64) -> Result<Option<Group>> {
        self.store.find_group_by_key(name, parent_id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Group>> {
        self.store.find_groups_by_name(name).await
    }

    pub async fn children(&self, group_id: i64) -> Result<Vec<Group>> {
        self.store.child_groups(group_id).await
    }

    /// Ancestors of `group_id`, root first, excluding the group itself.
    ///
    /// Traversal is bounded by `max_depth`; a revisited group or a chain
    /// longer than the bound is reported as a validation failure.
    pub async fn ancestors(&self, group_id: i64) -> Result<Vec<Group>> {
        let group = self.get(group_id).await?;

        let mut chain = Vec::new();
        let mut seen = HashSet::from([group.id]);
        let mut parent_id = group.parent_id;

        while parent_id != ROOT_PARENT_ID {
            if chain.len() >= self.max_depth {
                return Err(AuthzError::ValidationError(format!(
                    "group {} exceeds the maximum depth of {}",
                    group_id, self.max_depth
                )));
            }
            if !seen.insert(parent_id) {
                return Err(AuthzError::ValidationError(format!(
                    "cycle detected above group {} at group {}",
                    group_id, parent_id
                )));
            }

            let parent = self.store.find_group(parent_id).await?.ok_or_else(|| {
                AuthzError::ValidationError(format!(
                    "group {} references missing parent {}",
                    group_id, parent_id
                ))
            })?;
            parent_id = parent.parent_id;
            chain.push(parent);
        }

        chain.reverse();
        Ok(chain)
    }

    /// Whether `ancestor_id` lies on the parent chain of `group_id`.
    pub async fn is_ancestor(&self, ancestor_id: i64, group_id: i64) -> Result<bool> {
        Ok(self
            .ancestors(group_id)
            .await?
            .iter()
            .any(|g| g.id == ancestor_id))
    }

    /// Re-parent a group. The new parent may not be the group itself or any
    /// of its descendants, and the moved subtree must still fit within
    /// `max_depth` levels. Both checks run atomically with the write.
    pub async fn move_group(&self, group_id: i64, new_parent_id: i64) -> Result<Group> {
        let group = self.get(group_id).await?;

        if new_parent_id == group_id {
            return Err(AuthzError::ValidationError(format!(
                "group {} cannot be its own parent",
                group_id
            )));
        }

        let moved = self
            .store
            .reparent_group(group.id, new_parent_id, self.max_depth)
            .await?;
        info!(group = %moved, from = group.parent_id, to = new_parent_id, "Group moved");
        Ok(moved)
    }

    /// Record `user_id` as a member of `group_id`. Idempotent; grants nothing.
    pub async fn add_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.get(group_id).await?;
        if self.store.find_user_by_id(user_id).await?.is_none() {
            return Err(AuthzError::not_found("user", user_id.to_string()));
        }
        self.store.insert_group_member(group_id, user_id).await
    }

    pub async fn members(&self, group_id: i64) -> Result<Vec<i64>> {
        self.store.group_members(group_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryAuthzStore;

    fn hierarchy() -> GroupHierarchy {
        GroupHierarchy::new(Arc::new(InMemoryAuthzStore::new()), 8)
    }

    #[tokio::test]
    async fn test_create_is_idempotent_per_name_and_parent() {
        let groups = hierarchy();

        let root = groups.create_group("system", 0, "system", "").await.unwrap();
        let again = groups.create_group("system", 0, "system", "changed").await.unwrap();
        assert_eq!(root, again);

        let nested = groups.create_group("system", root, "team", "").await.unwrap();
        assert_ne!(root, nested);
    }

    #[tokio::test]
    async fn test_ancestors_are_root_first() {
        let groups = hierarchy();
        let root = groups.create_group("root", 0, "system", "").await.unwrap();
        let dept = groups.create_group("dept", root, "dept", "").await.unwrap();
        let team = groups.create_group("team", dept, "team", "").await.unwrap();

        let chain: Vec<i64> = groups.ancestors(team).await.unwrap().iter().map(|g| g.id).collect();
        assert_eq!(chain, vec![root, dept]);
        assert!(groups.ancestors(root).await.unwrap().is_empty());
        assert!(groups.is_ancestor(root, team).await.unwrap());
        assert!(!groups.is_ancestor(team, root).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_parent_is_not_found() {
        let groups = hierarchy();
        let err = groups.create_group("orphan", 42, "team", "").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_move_rejects_self_and_descendants() {
        let groups = hierarchy();
        let root = groups.create_group("root", 0, "system", "").await.unwrap();
        let dept = groups.create_group("dept", root, "dept", "").await.unwrap();
        let team = groups.create_group("team", dept, "team", "").await.unwrap();

        assert!(matches!(
            groups.move_group(dept, dept).await,
            Err(AuthzError::ValidationError(_))
        ));
        assert!(matches!(
            groups.move_group(root, team).await,
            Err(AuthzError::ValidationError(_))
        ));

        let moved = groups.move_group(team, root).await.unwrap();
        assert_eq!(moved.parent_id, root);
        assert_eq!(groups.children(root).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_depth_is_bounded() {
        let groups = GroupHierarchy::new(Arc::new(InMemoryAuthzStore::new()), 3);
        let a = groups.create_group("a", 0, "l", "").await.unwrap();
        let b = groups.create_group("b", a, "l", "").await.unwrap();
        let c = groups.create_group("c", b, "l", "").await.unwrap();

        assert!(matches!(
            groups.create_group("d", c, "l", "").await,
            Err(AuthzError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_move_counts_the_depth_of_the_moved_subtree() {
        let groups = GroupHierarchy::new(Arc::new(InMemoryAuthzStore::new()), 3);
        let a = groups.create_group("a", 0, "l", "").await.unwrap();
        let b = groups.create_group("b", a, "l", "").await.unwrap();
        let x = groups.create_group("x", 0, "l", "").await.unwrap();
        let y = groups.create_group("y", x, "l", "").await.unwrap();
        let z = groups.create_group("z", y, "l", "").await.unwrap();

        assert!(matches!(
            groups.move_group(x, b).await,
            Err(AuthzError::ValidationError(_))
        ));
        assert_eq!(groups.get(x).await.unwrap().parent_id, ROOT_PARENT_ID);
        assert_eq!(groups.ancestors(z).await.unwrap().len(), 2);

        // y with its child z fits under a
        let moved = groups.move_group(y, a).await.unwrap();
        assert_eq!(moved.parent_id, a);
        let chain: Vec<i64> = groups.ancestors(z).await.unwrap().iter().map(|g| g.id).collect();
        assert_eq!(chain, vec![a, y]);
    }

    #[tokio::test]
    async fn test_concurrent_opposite_moves_never_form_a_cycle() {
        let store = Arc::new(InMemoryAuthzStore::new());
        let groups = GroupHierarchy::new(store, 8);
        let root = groups.create_group("root", 0, "system", "").await.unwrap();
        let a = groups.create_group("a", root, "l", "").await.unwrap();
        let b = groups.create_group("b", root, "l", "").await.unwrap();

        let first = tokio::spawn({
            let groups = groups.clone();
            async move { groups.move_group(a, b).await }
        });
        let second = tokio::spawn({
            let groups = groups.clone();
            async move { groups.move_group(b, a).await }
        });
        let outcomes = [first.await.unwrap().is_ok(), second.await.unwrap().is_ok()];

        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        assert!(groups.ancestors(a).await.is_ok());
        assert!(groups.ancestors(b).await.is_ok());
    }
}

//! Persistence boundary for the authorization records
//!
//! Every `*_if_absent` / `upsert_*` method must be an atomic create-or-get at
//! the storage boundary: two callers racing on the same unique key (possibly
//! from different processes) both observe the single stored row.

pub mod memory;
pub mod postgres;

use crate::{
    error::{AuthzError, Result},
    models::*,
};
use async_trait::async_trait;
use auth_identity::UserStore;
use std::collections::BTreeSet;

pub use memory::InMemoryAuthzStore;
pub use postgres::PostgresAuthzStore;

#[async_trait]
pub trait OperationStore: Send + Sync {
    /// Create-or-get keyed by `(resource_type, operation_name)`
    async fn upsert_operation(&self, resource_type: &str, operation_name: &str) -> Result<Operation>;

    async fn find_operation(&self, resource_type: &str, operation_name: &str) -> Result<Option<Operation>>;

    /// Unknown ids are skipped
    async fn operations_by_ids(&self, ids: &[i64]) -> Result<Vec<Operation>>;

    async fn operations_by_resource_types(&self, resource_types: &[String]) -> Result<Vec<Operation>>;

    async fn operations_by_names(&self, operation_names: &[String]) -> Result<Vec<Operation>>;

    async fn list_operations(&self) -> Result<Vec<Operation>>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Create-or-get keyed by `(name, parent_id)`
    async fn insert_group_if_absent(&self, group: NewGroup) -> Result<Group>;

    async fn find_group(&self, id: i64) -> Result<Option<Group>>;

    async fn find_group_by_key(&self, name: &str, parent_id: i64) -> Result<Option<Group>>;

    async fn find_groups_by_name(&self, name: &str) -> Result<Vec<Group>>;

    async fn child_groups(&self, parent_id: i64) -> Result<Vec<Group>>;

    /// Re-parent `id` under `parent_id`. The cycle and depth checks run in
    /// the same critical section as the write, so concurrent moves cannot
    /// interleave between them.
    async fn reparent_group(&self, id: i64, parent_id: i64, max_depth: usize) -> Result<Group>;

    async fn count_groups(&self) -> Result<u64>;

    /// Idempotent
    async fn insert_group_member(&self, group_id: i64, user_id: i64) -> Result<()>;

    async fn group_members(&self, group_id: i64) -> Result<Vec<i64>>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Create-or-get keyed by `(group_id, name)`. When the role already
    /// exists its stored operation set is returned as-is and the flag is false.
    async fn insert_role_if_absent(&self, role: NewRole) -> Result<(Role, bool)>;

    async fn find_role(&self, id: i64) -> Result<Option<Role>>;

    async fn find_role_by_key(&self, group_id: i64, name: &str) -> Result<Option<Role>>;

    async fn roles_in_group(&self, group_id: i64) -> Result<Vec<Role>>;

    async fn replace_role_operations(&self, role_id: i64, operations: &BTreeSet<i64>) -> Result<Role>;

    async fn count_roles(&self) -> Result<u64>;
}

#[async_trait]
pub trait BundleStore: Send + Sync {
    /// Attach every user or none of them. Already-held bindings are kept as-is.
    async fn bind_users(&self, group_id: i64, role_id: i64, user_ids: &[i64]) -> Result<()>;

    /// Returns whether a binding was removed
    async fn unbind_user(&self, group_id: i64, role_id: i64, user_id: i64) -> Result<bool>;

    async fn bindings_for_user(&self, user_id: i64) -> Result<Vec<RoleBinding>>;

    async fn bundle(&self, group_id: i64, role_id: i64) -> Result<Bundle>;

    async fn count_bindings(&self) -> Result<u64>;
}

/// Everything the authorization core reads and writes
pub trait AuthzStore: OperationStore + GroupStore + RoleStore + BundleStore + UserStore {}

impl<T> AuthzStore for T where T: OperationStore + GroupStore + RoleStore + BundleStore + UserStore {}

/// Validate a re-parent against the tree as seen inside the store's lock.
///
/// `chain` is the new parent followed by its ancestors and `height` is the
/// number of levels below `group_id`. The whole tree may hold at most
/// `max_depth` levels.
pub(crate) fn check_reparent(
    group_id: i64,
    parent_id: i64,
    chain: &[i64],
    height: usize,
    max_depth: usize,
) -> Result<()> {
    if chain.contains(&group_id) {
        return Err(AuthzError::ValidationError(format!(
            "group {} is an ancestor of {}; moving would create a cycle",
            group_id, parent_id
        )));
    }
    if chain.len() + height >= max_depth {
        return Err(AuthzError::ValidationError(format!(
            "moving group {} under {} exceeds the maximum depth of {}",
            group_id, parent_id, max_depth
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reparent_counts_the_moved_subtree() {
        // parent chain of two plus the group plus two levels below it
        assert!(check_reparent(5, 2, &[2, 1], 2, 4).is_err());
        assert!(check_reparent(5, 2, &[2, 1], 1, 4).is_ok());
        assert!(check_reparent(5, ROOT_PARENT_ID, &[], 3, 4).is_ok());
        assert!(check_reparent(5, ROOT_PARENT_ID, &[], 4, 4).is_err());
    }

    #[test]
    fn test_check_reparent_rejects_cycles() {
        assert!(matches!(
            check_reparent(1, 3, &[3, 2, 1], 0, 32),
            Err(AuthzError::ValidationError(_))
        ));
    }
}

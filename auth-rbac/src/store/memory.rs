//! In-memory store for tests, development and single-process deployments
//!
//! All state sits behind one `RwLock`, so every create-or-get and every
//! bundle batch is atomic with respect to other callers.

use super::{check_reparent, BundleStore, GroupStore, OperationStore, RoleStore};
use crate::{
    error::{AuthzError, Result},
    models::*,
};
use async_trait::async_trait;
use auth_identity::{IdentityError, NewUser, User, UserStore};
use database_layer::AuditFields;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct State {
    last_id: i64,
    operations: BTreeMap<i64, Operation>,
    operation_keys: HashMap<(String, String), i64>,
    groups: BTreeMap<i64, Group>,
    group_keys: HashMap<(String, i64), i64>,
    group_members: BTreeSet<(i64, i64)>,
    roles: BTreeMap<i64, Role>,
    role_keys: HashMap<(i64, String), i64>,
    /// (user_id, group_id, role_id)
    bindings: BTreeSet<(i64, i64, i64)>,
    users: BTreeMap<i64, User>,
    user_keys: HashMap<String, i64>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Store backed by process memory
#[derive(Default)]
pub struct InMemoryAuthzStore {
    state: RwLock<State>,
    offline: AtomicBool,
}

impl InMemoryAuthzStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a storage error, as an unreachable database would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthzError::StorageError("in-memory store is offline".to_string()));
        }
        Ok(())
    }

    fn ensure_online_identity(&self) -> std::result::Result<(), IdentityError> {
        self.ensure_online()
            .map_err(|e| IdentityError::StorageError(e.to_string()))
    }
}

#[async_trait]
impl OperationStore for InMemoryAuthzStore {
    async fn upsert_operation(&self, resource_type: &str, operation_name: &str) -> Result<Operation> {
        self.ensure_online()?;
        let mut state = self.state.write();
        let key = (resource_type.to_string(), operation_name.to_string());

        if let Some(existing) = state
            .operation_keys
            .get(&key)
            .and_then(|id| state.operations.get(id))
        {
            return Ok(existing.clone());
        }

        let id = state.next_id();
        let operation = Operation {
            id,
            resource_type: key.0.clone(),
            operation_name: key.1.clone(),
            audit: AuditFields::new(),
        };
        state.operation_keys.insert(key, id);
        state.operations.insert(id, operation.clone());
        Ok(operation)
    }

    async fn find_operation(&self, resource_type: &str, operation_name: &str) -> Result<Option<Operation>> {
        self.ensure_online()?;
        let state = self.state.read();
        let key = (resource_type.to_string(), operation_name.to_string());
        Ok(state
            .operation_keys
            .get(&key)
            .and_then(|id| state.operations.get(id))
            .cloned())
    }

    async fn operations_by_ids(&self, ids: &[i64]) -> Result<Vec<Operation>> {
        self.ensure_online()?;
        let state = self.state.read();
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(wanted
            .iter()
            .filter_map(|id| state.operations.get(id))
            .cloned()
            .collect())
    }

    async fn operations_by_resource_types(&self, resource_types: &[String]) -> Result<Vec<Operation>> {
        self.ensure_online()?;
        let state = self.state.read();
        Ok(state
            .operations
            .values()
            .filter(|op| resource_types.contains(&op.resource_type))
            .cloned()
            .collect())
    }

    async fn operations_by_names(&self, operation_names: &[String]) -> Result<Vec<Operation>> {
        self.ensure_online()?;
        let state = self.state.read();
        Ok(state
            .operations
            .values()
            .filter(|op| operation_names.contains(&op.operation_name))
            .cloned()
            .collect())
    }

    async fn list_operations(&self) -> Result<Vec<Operation>> {
        self.ensure_online()?;
        Ok(self.state.read().operations.values().cloned().collect())
    }
}

#[async_trait]
impl GroupStore for InMemoryAuthzStore {
    async fn insert_group_if_absent(&self, group: NewGroup) -> Result<Group> {
        self.ensure_online()?;
        let mut state = self.state.write();
        let key = (group.name.clone(), group.parent_id);

        if let Some(existing) = state.group_keys.get(&key).and_then(|id| state.groups.get(id)) {
            return Ok(existing.clone());
        }

        let id = state.next_id();
        let stored = Group {
            id,
            name: group.name,
            parent_id: group.parent_id,
            level: group.level,
            description: group.description,
            audit: AuditFields::new(),
        };
        state.group_keys.insert(key, id);
        state.groups.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        self.ensure_online()?;
        Ok(self.state.read().groups.get(&id).cloned())
    }

    async fn find_group_by_key(&self, name: &str, parent_id: i64) -> Result<Option<Group>> {
        self.ensure_online()?;
        let state = self.state.read();
        Ok(state
            .group_keys
            .get(&(name.to_string(), parent_id))
            .and_then(|id| state.groups.get(id))
            .cloned())
    }

    async fn find_groups_by_name(&self, name: &str) -> Result<Vec<Group>> {
        self.ensure_online()?;
        Ok(self
            .state
            .read()
            .groups
            .values()
            .filter(|g| g.name == name)
            .cloned()
            .collect())
    }

    async fn child_groups(&self, parent_id: i64) -> Result<Vec<Group>> {
        self.ensure_online()?;
        Ok(self
            .state
            .read()
            .groups
            .values()
            .filter(|g| g.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn reparent_group(&self, id: i64, parent_id: i64, max_depth: usize) -> Result<Group> {
        self.ensure_online()?;
        let mut state = self.state.write();

        let current = state
            .groups
            .get(&id)
            .cloned()
            .ok_or_else(|| AuthzError::not_found("group", id.to_string()))?;

        let mut chain = Vec::new();
        let mut next = parent_id;
        while next != ROOT_PARENT_ID {
            if chain.len() > max_depth || chain.contains(&next) {
                return Err(AuthzError::ValidationError(format!(
                    "group {} sits on a malformed chain",
                    parent_id
                )));
            }
            let parent = state
                .groups
                .get(&next)
                .ok_or_else(|| AuthzError::not_found("group", next.to_string()))?;
            chain.push(next);
            if next == id {
                break;
            }
            next = parent.parent_id;
        }

        let mut height = 0;
        let mut frontier = vec![id];
        while height <= max_depth {
            frontier = state
                .groups
                .values()
                .filter(|g| frontier.contains(&g.parent_id))
                .map(|g| g.id)
                .collect();
            if frontier.is_empty() {
                break;
            }
            height += 1;
        }

        check_reparent(id, parent_id, &chain, height, max_depth)?;

        let new_key = (current.name.clone(), parent_id);
        if let Some(other) = state.group_keys.get(&new_key) {
            if *other != id {
                return Err(AuthzError::Conflict(format!(
                    "group '{}' already exists under parent {}",
                    current.name, parent_id
                )));
            }
        }

        state.group_keys.remove(&(current.name.clone(), current.parent_id));
        state.group_keys.insert(new_key, id);

        let group = state
            .groups
            .get_mut(&id)
            .ok_or_else(|| AuthzError::not_found("group", id.to_string()))?;
        group.parent_id = parent_id;
        group.audit.touch();
        Ok(group.clone())
    }

    async fn count_groups(&self) -> Result<u64> {
        self.ensure_online()?;
        Ok(self.state.read().groups.len() as u64)
    }

    async fn insert_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.ensure_online()?;
        self.state.write().group_members.insert((group_id, user_id));
        Ok(())
    }

    async fn group_members(&self, group_id: i64) -> Result<Vec<i64>> {
        self.ensure_online()?;
        Ok(self
            .state
            .read()
            .group_members
            .iter()
            .filter(|(group, _)| *group == group_id)
            .map(|(_, user)| *user)
            .collect())
    }
}

#[async_trait]
impl RoleStore for InMemoryAuthzStore {
    async fn insert_role_if_absent(&self, role: NewRole) -> Result<(Role, bool)> {
        self.ensure_online()?;
        let mut state = self.state.write();
        let key = (role.group_id, role.name.clone());

        if let Some(existing) = state.role_keys.get(&key).and_then(|id| state.roles.get(id)) {
            return Ok((existing.clone(), false));
        }

        let id = state.next_id();
        let stored = Role {
            id,
            group_id: role.group_id,
            name: role.name,
            description: role.description,
            operations: role.operations,
            audit: AuditFields::new(),
        };
        state.role_keys.insert(key, id);
        state.roles.insert(id, stored.clone());
        Ok((stored, true))
    }

    async fn find_role(&self, id: i64) -> Result<Option<Role>> {
        self.ensure_online()?;
        Ok(self.state.read().roles.get(&id).cloned())
    }

    async fn find_role_by_key(&self, group_id: i64, name: &str) -> Result<Option<Role>> {
        self.ensure_online()?;
        let state = self.state.read();
        Ok(state
            .role_keys
            .get(&(group_id, name.to_string()))
            .and_then(|id| state.roles.get(id))
            .cloned())
    }

    async fn roles_in_group(&self, group_id: i64) -> Result<Vec<Role>> {
        self.ensure_online()?;
        Ok(self
            .state
            .read()
            .roles
            .values()
            .filter(|r| r.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn replace_role_operations(&self, role_id: i64, operations: &BTreeSet<i64>) -> Result<Role> {
        self.ensure_online()?;
        let mut state = self.state.write();
        let role = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| AuthzError::not_found("role", role_id.to_string()))?;
        role.operations = operations.clone();
        role.audit.touch();
        Ok(role.clone())
    }

    async fn count_roles(&self) -> Result<u64> {
        self.ensure_online()?;
        Ok(self.state.read().roles.len() as u64)
    }
}

#[async_trait]
impl BundleStore for InMemoryAuthzStore {
    async fn bind_users(&self, group_id: i64, role_id: i64, user_ids: &[i64]) -> Result<()> {
        self.ensure_online()?;
        let mut state = self.state.write();

        if let Some(missing) = user_ids.iter().find(|id| !state.users.contains_key(id)) {
            return Err(AuthzError::not_found("user", missing.to_string()));
        }

        for user_id in user_ids {
            state.bindings.insert((*user_id, group_id, role_id));
        }
        Ok(())
    }

    async fn unbind_user(&self, group_id: i64, role_id: i64, user_id: i64) -> Result<bool> {
        self.ensure_online()?;
        Ok(self.state.write().bindings.remove(&(user_id, group_id, role_id)))
    }

    async fn bindings_for_user(&self, user_id: i64) -> Result<Vec<RoleBinding>> {
        self.ensure_online()?;
        Ok(self
            .state
            .read()
            .bindings
            .range((user_id, i64::MIN, i64::MIN)..=(user_id, i64::MAX, i64::MAX))
            .map(|(_, group_id, role_id)| RoleBinding {
                group_id: *group_id,
                role_id: *role_id,
            })
            .collect())
    }

    async fn bundle(&self, group_id: i64, role_id: i64) -> Result<Bundle> {
        self.ensure_online()?;
        let user_ids = self
            .state
            .read()
            .bindings
            .iter()
            .filter(|(_, g, r)| *g == group_id && *r == role_id)
            .map(|(user, _, _)| *user)
            .collect();
        Ok(Bundle {
            group_id,
            role_id,
            user_ids,
        })
    }

    async fn count_bindings(&self) -> Result<u64> {
        self.ensure_online()?;
        Ok(self.state.read().bindings.len() as u64)
    }
}

#[async_trait]
impl UserStore for InMemoryAuthzStore {
    async fn insert_user_if_absent(&self, user: NewUser) -> auth_identity::Result<User> {
        self.ensure_online_identity()?;
        let mut state = self.state.write();

        if let Some(existing) = state
            .user_keys
            .get(&user.username)
            .and_then(|id| state.users.get(id))
        {
            return Ok(existing.clone());
        }

        let id = state.next_id();
        let username = user.username.clone();
        let stored = user.into_user(id);
        state.user_keys.insert(username, id);
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_user_by_id(&self, id: i64) -> auth_identity::Result<Option<User>> {
        self.ensure_online_identity()?;
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn find_user_by_name(&self, username: &str) -> auth_identity::Result<Option<User>> {
        self.ensure_online_identity()?;
        let state = self.state.read();
        Ok(state
            .user_keys
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_users_by_names(&self, usernames: &[String]) -> auth_identity::Result<Vec<User>> {
        self.ensure_online_identity()?;
        let state = self.state.read();
        Ok(usernames
            .iter()
            .filter_map(|name| state.user_keys.get(name))
            .filter_map(|id| state.users.get(id))
            .cloned()
            .collect())
    }

    async fn count_users(&self) -> auth_identity::Result<u64> {
        self.ensure_online_identity()?;
        Ok(self.state.read().users.len() as u64)
    }
}

//! Role definitions: named operation sets scoped to one group

use crate::{
    cache::RoleOperationCache,
    error::{AuthzError, Result},
    models::*,
    store::AuthzStore,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct RoleDefinitions {
    store: Arc<dyn AuthzStore>,
    cache: Option<Arc<RoleOperationCache>>,
}

impl RoleDefinitions {
    pub fn new(store: Arc<dyn AuthzStore>) -> Self {
        Self { store, cache: None }
    }

    /// Share a resolved-operations cache with the engine
    pub fn with_cache(mut self, cache: Arc<RoleOperationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Create-or-get keyed by `(group_id, name)`.
    ///
    /// An existing role keeps whatever operation set it currently stores;
    /// `operation_ids` only applies to a freshly created role.
    pub async fn create_role(
        &self,
        group_id: i64,
        name: &str,
        description: &str,
        operation_ids: impl IntoIterator<Item = i64>,
    ) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(AuthzError::ValidationError("role name must not be empty".to_string()));
        }
        if self.store.find_group(group_id).await?.is_none() {
            return Err(AuthzError::not_found("group", group_id.to_string()));
        }

        let operations: BTreeSet<i64> = operation_ids.into_iter().collect();
        self.ensure_operations_exist(&operations).await?;

        let (role, created) = self
            .store
            .insert_role_if_absent(NewRole {
                group_id,
                name: name.to_string(),
                description: description.to_string(),
                operations,
            })
            .await?;

        if created {
            info!(role_id = role.id, group_id, name, operations = role.operations.len(), "Role created");
        } else {
            debug!(role_id = role.id, group_id, name, "Role already defined; stored operations kept");
        }
        Ok(role.id)
    }

    pub async fn get(&self, role_id: i64) -> Result<Role> {
        self.store
            .find_role(role_id)
            .await?
            .ok_or_else(|| AuthzError::not_found("role", role_id.to_string()))
    }

    pub async fn find(&self, group_id: i64, name: &str) -> Result<Option<Role>> {
        self.store.find_role_by_key(group_id, name).await
    }

    pub async fn list(&self, group_id: i64) -> Result<Vec<Role>> {
        self.store.roles_in_group(group_id).await
    }

    pub async fn operations_of(&self, role_id: i64) -> Result<BTreeSet<i64>> {
        Ok(self.get(role_id).await?.operations)
    }

    /// Replace a role's operation set. This is the administrator edit path.
    pub async fn set_operations(
        &self,
        role_id: i64,
        operation_ids: impl IntoIterator<Item = i64>,
    ) -> Result<()> {
        let operations: BTreeSet<i64> = operation_ids.into_iter().collect();
        self.ensure_operations_exist(&operations).await?;

        let role = self.store.replace_role_operations(role_id, &operations).await?;
        if let Some(cache) = &self.cache {
            cache.invalidate(role_id);
        }

        info!(role_id, name = %role.name, operations = operations.len(), "Role operations updated");
        Ok(())
    }

    /// Operations granted by a role, resolved to full records.
    pub async fn resolved_operations(&self, role_id: i64) -> Result<Arc<Vec<Operation>>> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(role_id)) {
            return Ok(cached);
        }
        let generation = self.cache.as_ref().map(|c| c.generation(role_id));

        let ids: Vec<i64> = self.operations_of(role_id).await?.into_iter().collect();
        let operations = Arc::new(self.store.operations_by_ids(&ids).await?);

        if let (Some(cache), Some(generation)) = (&self.cache, generation) {
            if !cache.insert(role_id, generation, Arc::clone(&operations)) {
                debug!(role_id, "Role edited during load; result not cached");
            }
        }
        Ok(operations)
    }

    async fn ensure_operations_exist(&self, operations: &BTreeSet<i64>) -> Result<()> {
        if operations.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = operations.iter().copied().collect();
        let found: BTreeSet<i64> = self
            .store
            .operations_by_ids(&ids)
            .await?
            .into_iter()
            .map(|op| op.id)
            .collect();

        let missing: Vec<String> = operations
            .difference(&found)
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AuthzError::not_found("operation", missing.join(",")));
        }
        Ok(())
    }
}

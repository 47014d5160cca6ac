//! Registry of (resource type, operation name) pairs

use crate::{
    error::{AuthzError, Result},
    models::*,
    store::AuthzStore,
};
use std::sync::Arc;
use tracing::debug;

/// Column width of both halves of the key
const MAX_FIELD_LEN: usize = 64;

#[derive(Clone)]
pub struct OperationCatalog {
    store: Arc<dyn AuthzStore>,
}

impl OperationCatalog {
    pub fn new(store: Arc<dyn AuthzStore>) -> Self {
        Self { store }
    }

    /// Create-or-get. Registering the same pair twice returns the same id.
    pub async fn register(&self, resource_type: &str, operation_name: &str) -> Result<i64> {
        validate_field("resource type", resource_type)?;
        validate_field("operation name", operation_name)?;

        let operation = self.store.upsert_operation(resource_type, operation_name).await?;
        debug!(id = operation.id, %operation, "Operation registered");
        Ok(operation.id)
    }

    /// Register every pair, stopping at the first failure.
    pub async fn register_all(&self, pairs: &[(&str, &str)]) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(pairs.len());
        for (resource_type, operation_name) in pairs {
            ids.push(self.register(resource_type, operation_name).await?);
        }
        Ok(ids)
    }

    /// The reserved `("*", "*")` operation, registered on first use.
    pub async fn wildcard(&self) -> Result<i64> {
        self.register(WILDCARD, WILDCARD).await
    }

    pub fn is_reserved(&self, resource_type: &str, operation_name: &str) -> bool {
        is_reserved_pair(resource_type, operation_name)
    }

    pub async fn lookup(&self, resource_type: &str, operation_name: &str) -> Result<i64> {
        self.store
            .find_operation(resource_type, operation_name)
            .await?
            .map(|op| op.id)
            .ok_or_else(|| AuthzError::not_found("operation", format!("{}:{}", resource_type, operation_name)))
    }

    pub async fn get(&self, id: i64) -> Result<Operation> {
        self.store
            .operations_by_ids(&[id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AuthzError::not_found("operation", id.to_string()))
    }

    pub async fn lookup_by_categories(&self, resource_types: &[String]) -> Result<Vec<Operation>> {
        self.store.operations_by_resource_types(resource_types).await
    }

    pub async fn lookup_by_names(&self, operation_names: &[String]) -> Result<Vec<Operation>> {
        self.store.operations_by_names(operation_names).await
    }

    pub async fn list(&self) -> Result<Vec<Operation>> {
        self.store.list_operations().await
    }
}

fn validate_field(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuthzError::ValidationError(format!("{} must not be empty", what)));
    }
    if value.len() > MAX_FIELD_LEN {
        return Err(AuthzError::ValidationError(format!(
            "{} exceeds {} characters: {}",
            what, MAX_FIELD_LEN, value
        )));
    }
    Ok(())
}

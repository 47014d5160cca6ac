use crate::{
    bundling::BundlingService,
    error::Result,
    models::*,
    roles::RoleDefinitions,
    store::AuthzStore,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves whether a user's held roles grant an operation.
///
/// Grants are a plain union over every bundle the user holds: there is no
/// explicit deny and the order of roles does not matter. A user with no
/// bundles is denied everything. Grants do not cascade through the group
/// tree; only users bundled to a role receive its operations.
#[derive(Clone)]
pub struct AuthorizationEngine {
    store: Arc<dyn AuthzStore>,

    /// Role lookups, optionally cached
    roles: RoleDefinitions,

    /// Bundle lookups, always live
    bundles: BundlingService,
}

impl AuthorizationEngine {
    pub fn new(store: Arc<dyn AuthzStore>, roles: RoleDefinitions) -> Self {
        let bundles = BundlingService::new(store.clone());
        Self {
            store,
            roles,
            bundles,
        }
    }

    // =============================================================================
    // Resolution
    // =============================================================================

    /// Whether `user_id` may perform `operation_name` on `resource_type`.
    ///
    /// Storage failures are returned as errors; use [`Self::authorize`] for a
    /// decision that fails closed.
    pub async fn is_allowed(
        &self,
        user_id: i64,
        resource_type: &str,
        operation_name: &str,
    ) -> Result<bool> {
        let bindings = self.bundles.roles_of(user_id).await?;
        if bindings.is_empty() {
            debug!(user_id, resource_type, operation_name, "No bundles held; denying");
            return Ok(false);
        }

        for binding in &bindings {
            let Some(operations) = self.operations_for(binding).await? else {
                continue;
            };

            if operations.iter().any(Operation::is_reserved_wildcard) {
                debug!(user_id, %binding, "Wildcard grant");
                return Ok(true);
            }
            if let Some(op) = operations
                .iter()
                .find(|op| op.matches(resource_type, operation_name))
            {
                debug!(user_id, %binding, operation = %op, "Operation granted");
                return Ok(true);
            }
        }

        debug!(user_id, resource_type, operation_name, "No held role grants the operation");
        Ok(false)
    }

    /// Fail-closed decision: any error while resolving is a deny.
    pub async fn authorize(&self, user_id: i64, resource_type: &str, operation_name: &str) -> Decision {
        match self.is_allowed(user_id, resource_type, operation_name).await {
            Ok(allowed) => Decision::from(allowed),
            Err(e) => {
                warn!(user_id, resource_type, operation_name, error = %e, "Authorization failed closed");
                Decision::Deny
            }
        }
    }

    /// Like [`Self::authorize`], resolving the identity by username first.
    /// Unknown users are denied.
    pub async fn authorize_user(&self, username: &str, resource_type: &str, operation_name: &str) -> Decision {
        match self.store.find_user_by_name(username).await {
            Ok(Some(user)) => self.authorize(user.id, resource_type, operation_name).await,
            Ok(None) => {
                debug!(username, "Unknown user; denying");
                Decision::Deny
            }
            Err(e) => {
                warn!(username, error = %e, "User lookup failed; authorization failed closed");
                Decision::Deny
            }
        }
    }

    /// Decide a batch of requests, one decision per request in order.
    pub async fn check_many(&self, requests: &[CheckRequest]) -> Vec<Decision> {
        let mut decisions = Vec::with_capacity(requests.len());
        for request in requests {
            decisions.push(
                self.authorize(request.user_id, &request.resource_type, &request.operation_name)
                    .await,
            );
        }
        decisions
    }

    // =============================================================================
    // Introspection
    // =============================================================================

    /// Every operation granted by the user's held roles, deduplicated and
    /// sorted by resource type then operation name.
    pub async fn effective_permissions(&self, user_id: i64) -> Result<Vec<Operation>> {
        let mut granted: BTreeMap<(String, String), Operation> = BTreeMap::new();

        for binding in self.bundles.roles_of(user_id).await? {
            let Some(operations) = self.operations_for(&binding).await? else {
                continue;
            };
            for op in operations.iter() {
                granted
                    .entry((op.resource_type.clone(), op.operation_name.clone()))
                    .or_insert_with(|| op.clone());
            }
        }

        Ok(granted.into_values().collect())
    }

    /// Operations of a held role, or `None` when the role no longer exists.
    async fn operations_for(&self, binding: &RoleBinding) -> Result<Option<Arc<Vec<Operation>>>> {
        match self.roles.resolved_operations(binding.role_id).await {
            Ok(operations) => Ok(Some(operations)),
            Err(e) if e.is_not_found() => {
                debug!(%binding, "Bundle references a missing role; skipping");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

use crate::{
    bundling::BundlingService,
    cache::RoleOperationCache,
    catalog::OperationCatalog,
    config::RbacConfig,
    engine::AuthorizationEngine,
    error::Result,
    hierarchy::GroupHierarchy,
    roles::RoleDefinitions,
    store::AuthzStore,
};
use std::sync::Arc;
use tracing::info;

/// All authorization components wired over one store
#[derive(Clone)]
pub struct AuthzService {
    store: Arc<dyn AuthzStore>,
    catalog: OperationCatalog,
    groups: GroupHierarchy,
    roles: RoleDefinitions,
    bundles: BundlingService,
    engine: AuthorizationEngine,
    cache: Option<Arc<RoleOperationCache>>,
}

impl AuthzService {
    pub fn new(store: Arc<dyn AuthzStore>, config: &RbacConfig) -> Result<Self> {
        config.validate()?;

        let cache = config
            .cache_role_operations
            .then(|| Arc::new(RoleOperationCache::new()));

        let mut roles = RoleDefinitions::new(store.clone());
        if let Some(cache) = &cache {
            roles = roles.with_cache(Arc::clone(cache));
        }

        let service = Self {
            catalog: OperationCatalog::new(store.clone()),
            groups: GroupHierarchy::new(store.clone(), config.max_group_depth),
            bundles: BundlingService::new(store.clone()),
            engine: AuthorizationEngine::new(store.clone(), roles.clone()),
            roles,
            store,
            cache,
        };

        info!(
            max_group_depth = config.max_group_depth,
            role_cache = config.cache_role_operations,
            "Authorization service initialized"
        );
        Ok(service)
    }

    pub fn store(&self) -> &Arc<dyn AuthzStore> {
        &self.store
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    pub fn groups(&self) -> &GroupHierarchy {
        &self.groups
    }

    pub fn roles(&self) -> &RoleDefinitions {
        &self.roles
    }

    pub fn bundles(&self) -> &BundlingService {
        &self.bundles
    }

    pub fn engine(&self) -> &AuthorizationEngine {
        &self.engine
    }

    /// Drop every cached role operation set
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

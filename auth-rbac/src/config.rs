use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};

/// Tuning knobs for the authorization core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Upper bound on upward traversal of the group tree
    pub max_group_depth: usize,
    /// Cache resolved role operation sets. Bundles are never cached.
    pub cache_role_operations: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            max_group_depth: 32,
            cache_role_operations: true,
        }
    }
}

impl RbacConfig {
    /// Load from `AUTHZ_MAX_GROUP_DEPTH` and `AUTHZ_CACHE_ROLE_OPERATIONS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(depth) = std::env::var("AUTHZ_MAX_GROUP_DEPTH") {
            config.max_group_depth = depth.parse().map_err(|_| {
                AuthzError::ValidationError(format!("AUTHZ_MAX_GROUP_DEPTH is not a number: {}", depth))
            })?;
        }

        if let Ok(flag) = std::env::var("AUTHZ_CACHE_ROLE_OPERATIONS") {
            config.cache_role_operations = flag.parse().map_err(|_| {
                AuthzError::ValidationError(format!(
                    "AUTHZ_CACHE_ROLE_OPERATIONS must be true or false: {}",
                    flag
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_group_depth == 0 {
            return Err(AuthzError::ValidationError(
                "max_group_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

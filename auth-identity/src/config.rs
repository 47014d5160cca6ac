use crate::error::{IdentityError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// bcrypt work factor for stored passwords
    pub bcrypt_cost: u32,
    /// Random bytes in a generated credential token (hex doubles the length)
    pub token_bytes: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            token_bytes: 16,
        }
    }
}

impl IdentityConfig {
    /// Load from `AUTHZ_BCRYPT_COST` and `AUTHZ_TOKEN_BYTES`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(cost) = std::env::var("AUTHZ_BCRYPT_COST") {
            config.bcrypt_cost = cost.parse().map_err(|_| {
                IdentityError::InvalidConfiguration(format!("AUTHZ_BCRYPT_COST is not a number: {}", cost))
            })?;
        }

        if let Ok(bytes) = std::env::var("AUTHZ_TOKEN_BYTES") {
            config.token_bytes = bytes.parse().map_err(|_| {
                IdentityError::InvalidConfiguration(format!("AUTHZ_TOKEN_BYTES is not a number: {}", bytes))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // bcrypt accepts 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(IdentityError::InvalidConfiguration(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        if self.token_bytes < 8 {
            return Err(IdentityError::InvalidConfiguration(format!(
                "credential tokens need at least 8 random bytes, got {}",
                self.token_bytes
            )));
        }
        Ok(())
    }
}

// Database connection management
use crate::error::{DatabaseError, DatabaseResult};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Connection pool sizing and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl PoolSettings {
    /// Read pool settings from `AUTHZ_DB_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> DatabaseResult<Self> {
        let defaults = Self::default();
        let settings = Self {
            max_connections: env_or("AUTHZ_DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_or("AUTHZ_DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout_secs: env_or("AUTHZ_DB_ACQUIRE_TIMEOUT_SECONDS", defaults.acquire_timeout_secs)?,
            idle_timeout_secs: env_or("AUTHZ_DB_IDLE_TIMEOUT_SECONDS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: env_or("AUTHZ_DB_MAX_LIFETIME_SECONDS", defaults.max_lifetime_secs)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        if self.max_connections == 0 {
            return Err(DatabaseError::InvalidConfiguration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(DatabaseError::InvalidConfiguration(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> DatabaseResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| {
            DatabaseError::InvalidConfiguration(format!("{} has an invalid value: {}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: Arc<PgPool>,
}

impl DatabasePool {
    /// Create a new database pool from connection string
    pub async fn new(connection_string: &str, settings: &PoolSettings) -> DatabaseResult<Self> {
        settings.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
            .connect(connection_string)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = settings.max_connections,
            "Database connection pool created successfully"
        );

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the pool is healthy
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        }
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

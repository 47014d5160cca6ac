//! PostgreSQL-backed authorization store
//!
//! Create-or-get calls use `INSERT ... ON CONFLICT DO NOTHING` followed by a
//! re-select, so concurrent seeding from several processes converges on one
//! row per unique key. Bundle batches run inside a single transaction.
//! Expected tables are described in `migrations/001_rbac.sql`.

use super::{check_reparent, BundleStore, GroupStore, OperationStore, RoleStore};
use crate::{
    error::{AuthzError, Result},
    models::*,
};
use async_trait::async_trait;
use auth_identity::{IdentityError, NewUser, User, UserStore};
use chrono::{DateTime, Utc};
use database_layer::AuditFields;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

const OPERATION_COLUMNS: &str =
    "id, resource_type, resource_operation, created_at, updated_at, deleted_at";
const GROUP_COLUMNS: &str =
    "id, name, parent_id, level, description, created_at, updated_at, deleted_at";
const ROLE_COLUMNS: &str =
    "id, group_id, name, description, created_at, updated_at, deleted_at";
const USER_COLUMNS: &str =
    "id, username, display_name, token, password_hash, created_at, updated_at, deleted_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PostgresAuthzStore {
    pool: PgPool,
}

impl PostgresAuthzStore {
    /// Create a new PostgreSQL store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create with connection string
    pub async fn from_connection_string(connection_string: &str) -> Result<Self> {
        let pool = PgPool::connect(connection_string)
            .await
            .map_err(|e| AuthzError::StorageError(format!("Failed to connect: {}", e)))?;

        Ok(Self::new(pool))
    }

    async fn attach_operations(&self, roles: Vec<Role>) -> Result<Vec<Role>> {
        if roles.is_empty() {
            return Ok(roles);
        }

        let ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
        let rows = sqlx::query(
            "SELECT role_id, operation_id FROM sys_group_role_operation WHERE role_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_role: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
        for row in rows {
            let role_id: i64 = row.try_get("role_id")?;
            let operation_id: i64 = row.try_get("operation_id")?;
            by_role.entry(role_id).or_default().insert(operation_id);
        }

        Ok(roles
            .into_iter()
            .map(|mut role| {
                role.operations = by_role.remove(&role.id).unwrap_or_default();
                role
            })
            .collect())
    }

    async fn fetch_roles(&self, sql: &str, bind: RoleFilter<'_>) -> Result<Vec<Role>> {
        let query = sqlx::query(sql);
        let query = match bind {
            RoleFilter::Id(id) => query.bind(id),
            RoleFilter::Group(group_id) => query.bind(group_id),
            RoleFilter::Key(group_id, name) => query.bind(group_id).bind(name),
        };
        let rows = query.fetch_all(&self.pool).await?;
        let roles = rows.iter().map(role_from_row).collect::<Result<Vec<_>>>()?;
        self.attach_operations(roles).await
    }
}

enum RoleFilter<'a> {
    Id(i64),
    Group(i64),
    Key(i64, &'a str),
}

fn audit_from_row(row: &PgRow) -> std::result::Result<AuditFields, sqlx::Error> {
    Ok(AuditFields {
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        deleted_at: row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")?,
    })
}

fn operation_from_row(row: &PgRow) -> Result<Operation> {
    Ok(Operation {
        id: row.try_get("id")?,
        resource_type: row.try_get("resource_type")?,
        operation_name: row.try_get("resource_operation")?,
        audit: audit_from_row(row)?,
    })
}

fn group_from_row(row: &PgRow) -> Result<Group> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        parent_id: row.try_get("parent_id")?,
        level: row.try_get("level")?,
        description: row.try_get("description")?,
        audit: audit_from_row(row)?,
    })
}

fn role_from_row(row: &PgRow) -> Result<Role> {
    Ok(Role {
        id: row.try_get("id")?,
        group_id: row.try_get("group_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        operations: BTreeSet::new(),
        audit: audit_from_row(row)?,
    })
}

fn user_from_row(row: &PgRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        token: row.try_get("token")?,
        password_hash: row.try_get("password_hash")?,
        audit: audit_from_row(row)?,
    })
}

fn count_to_u64(count: i64) -> Result<u64> {
    u64::try_from(count).map_err(|_| AuthzError::StorageError(format!("negative row count: {}", count)))
}

fn identity_storage_error(err: sqlx::Error) -> IdentityError {
    IdentityError::StorageError(err.to_string())
}

#[async_trait]
impl OperationStore for PostgresAuthzStore {
    async fn upsert_operation(&self, resource_type: &str, operation_name: &str) -> Result<Operation> {
        debug!(resource_type, operation_name, "Upserting operation");

        let inserted = sqlx::query(&format!(
            "INSERT INTO sys_resource_operation (resource_type, resource_operation) \
             VALUES ($1, $2) \
             ON CONFLICT (resource_type, resource_operation) DO NOTHING \
             RETURNING {OPERATION_COLUMNS}"
        ))
        .bind(resource_type)
        .bind(operation_name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            info!(resource_type, operation_name, "Operation registered");
            return operation_from_row(&row);
        }

        self.find_operation(resource_type, operation_name)
            .await?
            .ok_or_else(|| {
                AuthzError::StorageError(format!(
                    "operation {}:{} vanished after conflicting insert",
                    resource_type, operation_name
                ))
            })
    }

    async fn find_operation(&self, resource_type: &str, operation_name: &str) -> Result<Option<Operation>> {
        let row = sqlx::query(&format!(
            "SELECT {OPERATION_COLUMNS} FROM sys_resource_operation \
             WHERE resource_type = $1 AND resource_operation = $2 AND deleted_at IS NULL"
        ))
        .bind(resource_type)
        .bind(operation_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(operation_from_row).transpose()
    }

    async fn operations_by_ids(&self, ids: &[i64]) -> Result<Vec<Operation>> {
        let rows = sqlx::query(&format!(
            "SELECT {OPERATION_COLUMNS} FROM sys_resource_operation \
             WHERE id = ANY($1) AND deleted_at IS NULL ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(operation_from_row).collect()
    }

    async fn operations_by_resource_types(&self, resource_types: &[String]) -> Result<Vec<Operation>> {
        let rows = sqlx::query(&format!(
            "SELECT {OPERATION_COLUMNS} FROM sys_resource_operation \
             WHERE resource_type = ANY($1) AND deleted_at IS NULL ORDER BY id"
        ))
        .bind(resource_types)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(operation_from_row).collect()
    }

    async fn operations_by_names(&self, operation_names: &[String]) -> Result<Vec<Operation>> {
        let rows = sqlx::query(&format!(
            "SELECT {OPERATION_COLUMNS} FROM sys_resource_operation \
             WHERE resource_operation = ANY($1) AND deleted_at IS NULL ORDER BY id"
        ))
        .bind(operation_names)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(operation_from_row).collect()
    }

    async fn list_operations(&self) -> Result<Vec<Operation>> {
        let rows = sqlx::query(&format!(
            "SELECT {OPERATION_COLUMNS} FROM sys_resource_operation \
             WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(operation_from_row).collect()
    }
}

#[async_trait]
impl GroupStore for PostgresAuthzStore {
    async fn insert_group_if_absent(&self, group: NewGroup) -> Result<Group> {
        let inserted = sqlx::query(&format!(
            "INSERT INTO sys_group (name, parent_id, level, description) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name, parent_id) DO NOTHING \
             RETURNING {GROUP_COLUMNS}"
        ))
        .bind(&group.name)
        .bind(group.parent_id)
        .bind(&group.level)
        .bind(&group.description)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            info!(name = %group.name, parent_id = group.parent_id, "Group created");
            return group_from_row(&row);
        }

        self.find_group_by_key(&group.name, group.parent_id)
            .await?
            .ok_or_else(|| {
                AuthzError::StorageError(format!(
                    "group {} vanished after conflicting insert",
                    group.name
                ))
            })
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        let row = sqlx::query(&format!(
            "SELECT {GROUP_COLUMNS} FROM sys_group WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(group_from_row).transpose()
    }

    async fn find_group_by_key(&self, name: &str, parent_id: i64) -> Result<Option<Group>> {
        let row = sqlx::query(&format!(
            "SELECT {GROUP_COLUMNS} FROM sys_group \
             WHERE name = $1 AND parent_id = $2 AND deleted_at IS NULL"
        ))
        .bind(name)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(group_from_row).transpose()
    }

    async fn find_groups_by_name(&self, name: &str) -> Result<Vec<Group>> {
        let rows = sqlx::query(&format!(
            "SELECT {GROUP_COLUMNS} FROM sys_group \
             WHERE name = $1 AND deleted_at IS NULL ORDER BY id"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(group_from_row).collect()
    }

    async fn child_groups(&self, parent_id: i64) -> Result<Vec<Group>> {
        let rows = sqlx::query(&format!(
            "SELECT {GROUP_COLUMNS} FROM sys_group \
             WHERE parent_id = $1 AND deleted_at IS NULL ORDER BY id"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(group_from_row).collect()
    }

    async fn reparent_group(&self, id: i64, parent_id: i64, max_depth: usize) -> Result<Group> {
        let bound = i32::try_from(max_depth).unwrap_or(i32::MAX);
        let mut tx = self.pool.begin().await?;

        // Self-conflicting lock: concurrent moves and inserts wait for this one
        sqlx::query("LOCK TABLE sys_group IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let chain: Vec<i64> = if parent_id == ROOT_PARENT_ID {
            Vec::new()
        } else {
            sqlx::query_scalar(
                "WITH RECURSIVE chain (id, parent_id, depth) AS ( \
                     SELECT id, parent_id, 1 FROM sys_group WHERE id = $1 AND deleted_at IS NULL \
                     UNION ALL \
                     SELECT g.id, g.parent_id, c.depth + 1 FROM sys_group g \
                     JOIN chain c ON g.id = c.parent_id \
                     WHERE g.deleted_at IS NULL AND c.depth <= $2 \
                 ) \
                 SELECT id FROM chain ORDER BY depth",
            )
            .bind(parent_id)
            .bind(bound)
            .fetch_all(&mut *tx)
            .await?
        };
        if parent_id != ROOT_PARENT_ID && chain.is_empty() {
            return Err(AuthzError::not_found("group", parent_id.to_string()));
        }

        let height: Option<i32> = sqlx::query_scalar(
            "WITH RECURSIVE subtree (id, depth) AS ( \
                 SELECT id, 0 FROM sys_group WHERE id = $1 AND deleted_at IS NULL \
                 UNION ALL \
                 SELECT g.id, s.depth + 1 FROM sys_group g \
                 JOIN subtree s ON g.parent_id = s.id \
                 WHERE g.deleted_at IS NULL AND s.depth < $2 \
             ) \
             SELECT MAX(depth) FROM subtree",
        )
        .bind(id)
        .bind(bound)
        .fetch_one(&mut *tx)
        .await?;
        let Some(height) = height else {
            return Err(AuthzError::not_found("group", id.to_string()));
        };

        check_reparent(id, parent_id, &chain, usize::try_from(height).unwrap_or(usize::MAX), max_depth)?;

        let row = sqlx::query(&format!(
            "UPDATE sys_group SET parent_id = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {GROUP_COLUMNS}"
        ))
        .bind(id)
        .bind(parent_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        group_from_row(&row)
    }

    async fn count_groups(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sys_group WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        count_to_u64(count)
    }

    async fn insert_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO sys_group_user (group_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (group_id, user_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn group_members(&self, group_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar("SELECT user_id FROM sys_group_user WHERE group_id = $1 ORDER BY user_id")
            .bind(group_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

#[async_trait]
impl RoleStore for PostgresAuthzStore {
    async fn insert_role_if_absent(&self, role: NewRole) -> Result<(Role, bool)> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(&format!(
            "INSERT INTO sys_group_role (group_id, name, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (group_id, name) DO NOTHING \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(role.group_id)
        .bind(&role.name)
        .bind(&role.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = inserted else {
            tx.commit().await?;
            debug!(group_id = role.group_id, name = %role.name, "Role exists; operations untouched");
            let existing = self
                .find_role_by_key(role.group_id, &role.name)
                .await?
                .ok_or_else(|| {
                    AuthzError::StorageError(format!("role {} vanished after conflicting insert", role.name))
                })?;
            return Ok((existing, false));
        };

        let mut stored = role_from_row(&row)?;
        let operation_ids: Vec<i64> = role.operations.iter().copied().collect();
        sqlx::query(
            "INSERT INTO sys_group_role_operation (role_id, operation_id) \
             SELECT $1, UNNEST($2::BIGINT[]) \
             ON CONFLICT (role_id, operation_id) DO NOTHING",
        )
        .bind(stored.id)
        .bind(&operation_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        stored.operations = role.operations;
        info!(role_id = stored.id, name = %stored.name, "Role created");
        Ok((stored, true))
    }

    async fn find_role(&self, id: i64) -> Result<Option<Role>> {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM sys_group_role WHERE id = $1 AND deleted_at IS NULL");
        Ok(self.fetch_roles(&sql, RoleFilter::Id(id)).await?.into_iter().next())
    }

    async fn find_role_by_key(&self, group_id: i64, name: &str) -> Result<Option<Role>> {
        let sql = format!(
            "SELECT {ROLE_COLUMNS} FROM sys_group_role \
             WHERE group_id = $1 AND name = $2 AND deleted_at IS NULL"
        );
        Ok(self
            .fetch_roles(&sql, RoleFilter::Key(group_id, name))
            .await?
            .into_iter()
            .next())
    }

    async fn roles_in_group(&self, group_id: i64) -> Result<Vec<Role>> {
        let sql = format!(
            "SELECT {ROLE_COLUMNS} FROM sys_group_role \
             WHERE group_id = $1 AND deleted_at IS NULL ORDER BY id"
        );
        self.fetch_roles(&sql, RoleFilter::Group(group_id)).await
    }

    async fn replace_role_operations(&self, role_id: i64, operations: &BTreeSet<i64>) -> Result<Role> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query(&format!(
            "UPDATE sys_group_role SET updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(role_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = locked else {
            return Err(AuthzError::not_found("role", role_id.to_string()));
        };
        let mut role = role_from_row(&row)?;

        sqlx::query("DELETE FROM sys_group_role_operation WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        let operation_ids: Vec<i64> = operations.iter().copied().collect();
        sqlx::query(
            "INSERT INTO sys_group_role_operation (role_id, operation_id) \
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(role_id)
        .bind(&operation_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        role.operations = operations.clone();
        info!(role_id, operations = operations.len(), "Role operations replaced");
        Ok(role)
    }

    async fn count_roles(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sys_group_role WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        count_to_u64(count)
    }
}

#[async_trait]
impl BundleStore for PostgresAuthzStore {
    async fn bind_users(&self, group_id: i64, role_id: i64, user_ids: &[i64]) -> Result<()> {
        debug!(group_id, role_id, users = user_ids.len(), "Binding users");

        let distinct: Vec<i64> = user_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let mut tx = self.pool.begin().await?;

        let existing: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM sys_user WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(&distinct)
        .fetch_all(&mut *tx)
        .await?;

        if let Some(missing) = distinct.iter().find(|id| !existing.contains(id)) {
            tx.rollback().await?;
            return Err(AuthzError::not_found("user", missing.to_string()));
        }

        sqlx::query(
            "INSERT INTO sys_group_role_user (group_id, role_id, user_id) \
             SELECT $1, $2, UNNEST($3::BIGINT[]) \
             ON CONFLICT (group_id, role_id, user_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(role_id)
        .bind(&distinct)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(group_id, role_id, users = distinct.len(), "Users bound to role");
        Ok(())
    }

    async fn unbind_user(&self, group_id: i64, role_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM sys_group_role_user WHERE group_id = $1 AND role_id = $2 AND user_id = $3",
        )
        .bind(group_id)
        .bind(role_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn bindings_for_user(&self, user_id: i64) -> Result<Vec<RoleBinding>> {
        let rows = sqlx::query(
            "SELECT DISTINCT group_id, role_id FROM sys_group_role_user \
             WHERE user_id = $1 ORDER BY group_id, role_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<RoleBinding> {
                Ok(RoleBinding {
                    group_id: row.try_get("group_id")?,
                    role_id: row.try_get("role_id")?,
                })
            })
            .collect()
    }

    async fn bundle(&self, group_id: i64, role_id: i64) -> Result<Bundle> {
        let user_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT user_id FROM sys_group_role_user WHERE group_id = $1 AND role_id = $2",
        )
        .bind(group_id)
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Bundle {
            group_id,
            role_id,
            user_ids: user_ids.into_iter().collect(),
        })
    }

    async fn count_bindings(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sys_group_role_user")
            .fetch_one(&self.pool)
            .await?;
        count_to_u64(count)
    }
}

#[async_trait]
impl UserStore for PostgresAuthzStore {
    async fn insert_user_if_absent(&self, user: NewUser) -> auth_identity::Result<User> {
        let inserted = sqlx::query(&format!(
            "INSERT INTO sys_user (username, display_name, token, password_hash) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (username) DO NOTHING \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.token)
        .bind(&user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(identity_storage_error)?;

        if let Some(row) = inserted {
            info!(username = %user.username, "User created");
            return user_from_row(&row).map_err(identity_storage_error);
        }

        self.find_user_by_name(&user.username)
            .await?
            .ok_or_else(|| IdentityError::UserNotFound(user.username.clone()))
    }

    async fn find_user_by_id(&self, id: i64) -> auth_identity::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM sys_user WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(identity_storage_error)?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(identity_storage_error)
    }

    async fn find_user_by_name(&self, username: &str) -> auth_identity::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM sys_user WHERE username = $1 AND deleted_at IS NULL"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(identity_storage_error)?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(identity_storage_error)
    }

    async fn find_users_by_names(&self, usernames: &[String]) -> auth_identity::Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM sys_user WHERE username = ANY($1) AND deleted_at IS NULL"
        ))
        .bind(usernames)
        .fetch_all(&self.pool)
        .await
        .map_err(identity_storage_error)?;

        rows.iter()
            .map(user_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(identity_storage_error)
    }

    async fn count_users(&self) -> auth_identity::Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sys_user WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(identity_storage_error)?;
        u64::try_from(count).map_err(|_| IdentityError::StorageError(format!("negative row count: {}", count)))
    }
}

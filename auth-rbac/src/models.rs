use database_layer::AuditFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Marker that matches any resource type or operation name
pub const WILDCARD: &str = "*";

/// `parent_id` carried by root groups
pub const ROOT_PARENT_ID: i64 = 0;

/// A (resource type, operation name) pair; the atomic permission unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub resource_type: String,
    pub operation_name: String,
    pub audit: AuditFields,
}

impl Operation {
    /// The reserved `("*", "*")` grant
    pub fn is_reserved_wildcard(&self) -> bool {
        is_reserved_pair(&self.resource_type, &self.operation_name)
    }

    /// Whether holding this operation grants `operation_name` on `resource_type`.
    pub fn matches(&self, resource_type: &str, operation_name: &str) -> bool {
        (self.resource_type == WILDCARD || self.resource_type == resource_type)
            && (self.operation_name == WILDCARD || self.operation_name == operation_name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.operation_name)
    }
}

pub fn is_reserved_pair(resource_type: &str, operation_name: &str) -> bool {
    resource_type == WILDCARD && operation_name == WILDCARD
}

/// Organizational unit in the group tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// `ROOT_PARENT_ID` for a root group
    pub parent_id: i64,
    pub level: String,
    pub description: String,
    pub audit: AuditFields,
}

impl Group {
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub parent_id: i64,
    pub level: String,
    pub description: String,
}

/// Named operation set scoped to one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub description: String,
    pub operations: BTreeSet<i64>,
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub group_id: i64,
    pub name: String,
    pub description: String,
    pub operations: BTreeSet<i64>,
}

/// A (group, role) pair held by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleBinding {
    pub group_id: i64,
    pub role_id: i64,
}

impl fmt::Display for RoleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}/role#{}", self.group_id, self.role_id)
    }
}

/// Users attached to one (group, role) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub group_id: i64,
    pub role_id: i64,
    pub user_ids: BTreeSet<i64>,
}

/// Single authorization query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub user_id: i64,
    pub resource_type: String,
    pub operation_name: String,
}

impl CheckRequest {
    pub fn new(user_id: i64, resource_type: &str, operation_name: &str) -> Self {
        Self {
            user_id,
            resource_type: resource_type.to_string(),
            operation_name: operation_name.to_string(),
        }
    }
}

/// Outcome of an authorization query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::Deny => write!(f, "deny"),
        }
    }
}

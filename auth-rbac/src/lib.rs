//! Role-based authorization core
//!
//! This crate decides whether a user may perform an operation on a resource
//! category. It provides:
//! - An operation catalog of `(resource type, operation name)` pairs
//! - A tree of groups that scope roles
//! - Roles: named operation sets defined inside a group
//! - Bundles that attach users to a role within a group
//! - A resolution engine with wildcard grants and default deny
//! - An idempotent, best-effort bootstrap of the baseline records
//!
//! # Core Concepts
//!
//! - **Operation**: the atomic permission unit. `("*", "*")` is reserved and
//!   grants everything; a `*` on either side matches any value there.
//! - **Group**: organizational unit; roots have `parent_id == 0`.
//! - **Role**: defined in exactly one group.
//! - **Bundle**: a user holding a role within a group. Grants are the union of
//!   every held bundle and do not cascade to descendant groups.
//!
//! # Example
//!
//! ```rust
//! use auth_rbac::{AuthzService, InMemoryAuthzStore, RbacConfig};
//! use auth_identity::{NewUser, UserStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryAuthzStore::new());
//!     let authz = AuthzService::new(store.clone(), &RbacConfig::default())?;
//!
//!     let group = authz.groups().create_group("system", 0, "system", "").await?;
//!     let list = authz.catalog().register("project", "ProjectList").await?;
//!     let role = authz.roles().create_role(group, "developer", "", [list]).await?;
//!
//!     store.insert_user_if_absent(NewUser {
//!         username: "alice".to_string(),
//!         display_name: "Alice".to_string(),
//!         token: String::new(),
//!         password_hash: String::new(),
//!     }).await?;
//!     authz.bundles().bundle(group, role, &["alice".to_string()]).await?;
//!
//!     let decision = authz.engine().authorize_user("alice", "project", "ProjectList").await;
//!     assert!(decision.is_allowed());
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod store;
pub mod cache;
pub mod catalog;
pub mod hierarchy;
pub mod roles;
pub mod bundling;
pub mod engine;
pub mod service;
pub mod seed;
pub mod config;
pub mod error;

pub use models::*;
pub use store::*;
pub use cache::RoleOperationCache;
pub use catalog::OperationCatalog;
pub use hierarchy::GroupHierarchy;
pub use roles::RoleDefinitions;
pub use bundling::BundlingService;
pub use engine::AuthorizationEngine;
pub use service::AuthzService;
pub use seed::{SeedBootstrapper, SeedReport, SeedStep, StepReport, StepStatus};
pub use config::*;
pub use error::*;

//! Database plumbing shared by the authorization crates
//!
//! - **Connection Management**: PostgreSQL pooling with configurable sizing
//!   and health checks
//! - **Shared Record Fields**: the [`AuditFields`] value object every stored
//!   record embeds
//! - **Error Mapping**: a single [`DatabaseError`] type with unique-violation
//!   detection, used by the stores to absorb create-or-get races
//!
//! Schema creation and migrations are run by deployment tooling, not here.

pub mod connection;
pub mod models;
pub mod error;

pub use connection::*;
pub use models::*;
pub use error::*;

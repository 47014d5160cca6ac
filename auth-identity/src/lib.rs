//! User identity records for the authorization core
//! 
//! This crate provides:
//! - The [`User`] record and the [`UserStore`] persistence boundary
//! - Password hashing with bcrypt and random credential tokens
//! - Environment-driven [`IdentityConfig`]
//! 
//! Authentication itself (logins, sessions, token issuance) happens elsewhere;
//! the authorization crate only needs to resolve usernames to stored users.
//! 
//! # Example
//! 
//! ```rust
//! use auth_identity::{CredentialHasher, IdentityConfig};
//! 
//! let hasher = CredentialHasher::new(&IdentityConfig { bcrypt_cost: 4, token_bytes: 16 }).unwrap();
//! let hash = hasher.hash_password("123456").unwrap();
//! assert!(hasher.verify_password("123456", &hash).unwrap());
//! ```

pub mod models;
pub mod repository;
pub mod credentials;
pub mod config;
pub mod error;

pub use models::*;
pub use repository::*;
pub use credentials::*;
pub use config::*;
pub use error::*;

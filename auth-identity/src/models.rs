use serde::{Deserialize, Serialize};
use database_layer::AuditFields;

/// A stored user account.
///
/// Group and role membership is never embedded here; it lives in the
/// relations owned by the authorization crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// Random API credential token
    #[serde(skip_serializing)]
    pub token: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub audit: AuditFields,
}

/// Fields required to create a user. Credential material must already be hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub token: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            display_name: self.display_name,
            token: self.token,
            password_hash: self.password_hash,
            audit: AuditFields::new(),
        }
    }
}

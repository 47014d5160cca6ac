use auth_identity::IdentityError;
use database_layer::DatabaseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthzError {
    /// A referenced group, role, user or operation is absent
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
    
    /// Duplicate unique key; create-or-get paths absorb this
    #[error("Conflict: {0}")]
    Conflict(String),
    
    #[error("Storage error: {0}")]
    StorageError(String),
    
    /// Malformed input or hierarchy, e.g. a cyclic parent assignment
    #[error("Validation error: {0}")]
    ValidationError(String),
    
    #[error("Identity error: {0}")]
    IdentityError(String),
}

impl AuthzError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        AuthzError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthzError::NotFound { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, AuthzError::StorageError(_))
    }
}

impl From<DatabaseError> for AuthzError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unique_violation() {
            AuthzError::Conflict(err.to_string())
        } else {
            AuthzError::StorageError(err.to_string())
        }
    }
}

impl From<sqlx::Error> for AuthzError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

impl From<IdentityError> for AuthzError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::UserNotFound(name) => AuthzError::not_found("user", name),
            IdentityError::StorageError(msg) => AuthzError::StorageError(msg),
            IdentityError::InvalidUsername(msg) => AuthzError::ValidationError(msg),
            other => AuthzError::IdentityError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthzError>;

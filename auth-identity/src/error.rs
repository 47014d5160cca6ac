use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    
    #[error("Invalid username: {0}")]
    InvalidUsername(String),
    
    #[error("Hashing error: {0}")]
    HashingError(String),
    
    #[error("Invalid identity configuration: {0}")]
    InvalidConfiguration(String),
    
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    
    #[error("Invalid pool configuration: {0}")]
    InvalidConfiguration(String),
    
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the error came from a unique or primary key violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::SqlxError(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

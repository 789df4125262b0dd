/// Error type for every operation in this crate
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Unclassified driver or query failure
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Lookup by primary key found nothing
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Unique or foreign key constraint rejected the write
    #[error("Integrity conflict: {0}")]
    Conflict(String),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// True when the underlying driver could not reach the database at all.
    pub fn is_unavailable(&self) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(sea_orm::DbErr::Conn(_))
            | Self::Postgres(sea_orm::DbErr::ConnectionAcquire(_)) => true,
            Self::ConnectionFailed(_) | Self::HealthCheckFailed(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

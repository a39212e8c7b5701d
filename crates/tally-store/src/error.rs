//! # Store Error Types
//!
//! Error types for storage and persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / io::Error / serde_json::Error                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← code + message on stderr                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An index outside the collection is not an error: lookups return `None`
//! and mutations at such an index are no-ops.

use thiserror::Error;

/// Storage and persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Reading or writing a document file failed.
    ///
    /// ## When This Occurs
    /// - Data directory is missing or read-only
    /// - Disk full
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection couldn't be turned into JSON.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document exists but doesn't parse.
    ///
    /// Loading refuses to continue rather than start empty and overwrite the
    /// ledger on the next write.
    #[error("Stored document '{key}' is corrupt: {reason}")]
    CorruptDocument { key: String, reason: String },

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a CorruptDocument error.
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::CorruptDocument {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// sqlx::Error::Io             → StoreError::Io
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("Timed out waiting for a connection".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::Io(io_err) => StoreError::Io(io_err),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        Domain Error (CoreError)            │
//! │       │                                 │                               │
//! │       │                                 │ pricing / validation /        │
//! │       │                                 │ status transition             │
//! │       ▼                                 ▼                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Counter UI shows a form error or a "try again" message                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pressline_core::CoreError;
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID or ticket number doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: String,
        id: String,
    },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate ticket number
    /// - Any UNIQUE index violation
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation {
        field: String,
        value: String,
    },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Order line referencing a non-existent service
    /// - Payment referencing a non-existent order
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        message: String,
    },

    /// The write was refused by business rules (invalid input, totals
    /// mismatch, illegal status change).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A stored value could not be turned back into a domain value
    /// (e.g. a percentage column that is not a decimal).
    #[error("Corrupt {column} value: '{value}'")]
    CorruptValue {
        column: String,
        value: String,
    },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a CorruptValue error.
    pub fn corrupt(column: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::CorruptValue {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Returns the domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            DbError::Core(err) => Some(err),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown");
                    DbError::duplicate(field, "unknown")
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pressline_core::ValidationError;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let core = CoreError::InvalidInput(ValidationError::MustBePositive {
            field: "quantity".to_string(),
            value: 0,
        });
        let expected = core.to_string();
        let err: DbError = core.into();

        assert_eq!(err.to_string(), expected);
        assert!(matches!(err.as_core(), Some(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_message() {
        let err = DbError::duplicate("orders.ticket_number", "261019-0001");
        assert_eq!(
            err.to_string(),
            "Duplicate orders.ticket_number: '261019-0001' already exists"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Order", "abc");
        assert_eq!(err.to_string(), "Order not found: abc");
    }
}

/// Storage error taxonomy
///
/// Every data-layer operation returns `StoreResult<T>`. The variants let the
/// HTTP layer pick a status code without inspecting driver error strings.
///
/// # Classification
///
/// | Source                                   | Variant               |
/// |------------------------------------------|-----------------------|
/// | I/O, TLS, pool timeout/closed            | `Connectivity`        |
/// | SQLSTATE `08xxx`, `28xxx`, `3D000`       | `Connectivity`        |
/// | SQLSTATE `23503`                         | `ForeignKeyViolation` |
/// | SQLSTATE `23514`                         | `CheckViolation`      |
/// | other SQLSTATE `23xxx`                   | `ConstraintViolation` |
/// | `sqlx::Error::RowNotFound`               | `NotFound`            |
/// | column type check in `db::schema`        | `SchemaMismatch`      |
/// | anything else                            | `Database`            |

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result alias for data-layer operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached or rejected the connection
    #[error("database connectivity failure: {0}")]
    Connectivity(String),

    /// A referenced row does not exist
    #[error("foreign key violation on {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A CHECK constraint rejected the row
    #[error("check constraint violation on {constraint}")]
    CheckViolation { constraint: String },

    /// Any other integrity constraint (unique, not-null, exclusion)
    #[error("constraint violation on {constraint}")]
    ConstraintViolation { constraint: String },

    /// The targeted row does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An existing table's column cannot be decoded by the models
    #[error("column {table}.{column} is {found}, expected {expected}")]
    SchemaMismatch {
        table: &'static str,
        column: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Unclassified database failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// True when the failure is the caller's fault rather than the server's
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::ForeignKeyViolation { .. }
                | StoreError::CheckViolation { .. }
                | StoreError::ConstraintViolation { .. }
                | StoreError::NotFound(_)
        )
    }
}

/// SQLSTATE classes that mean the session never became usable
fn is_connectivity_code(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("28") || code == "3D000"
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row"),
            sqlx::Error::Io(e) => StoreError::Connectivity(e.to_string()),
            sqlx::Error::Tls(e) => StoreError::Connectivity(e.to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::Connectivity("timed out acquiring a connection".to_string())
            }
            sqlx::Error::PoolClosed => {
                StoreError::Connectivity("connection pool is closed".to_string())
            }
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref().is_some_and(is_connectivity_code) {
                    return StoreError::Connectivity(db_err.message().to_string());
                }

                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.kind() {
                    ErrorKind::ForeignKeyViolation => {
                        StoreError::ForeignKeyViolation { constraint }
                    }
                    ErrorKind::CheckViolation => StoreError::CheckViolation { constraint },
                    ErrorKind::UniqueViolation | ErrorKind::NotNullViolation => {
                        StoreError::ConstraintViolation { constraint }
                    }
                    _ => StoreError::Database(sqlx::Error::Database(db_err)),
                }
            }
            other => StoreError::Database(other),
        }
    }
}

//! Error types for the bookstore catalog

use thiserror::Error;

/// Result type alias for catalog operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for catalog operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed caller input (filter value, limit, identifier)
    #[error("{0}")]
    InvalidInput(String),

    /// Row not found
    #[error("{0}")]
    NotFound(String),

    /// Query execution failed while reading
    #[error("Read error: {}", describe_db_error(.0))]
    Read(#[source] tokio_postgres::Error),

    /// Statement execution failed while writing
    #[error("Write error: {}", describe_db_error(.0))]
    Write(#[source] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),
}

impl StoreError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Render a driver error with the server's message when there is one.
///
/// `tokio_postgres::Error` displays only its kind (`db error`); the server
/// message and the underlying cause live behind `as_db_error` and `source`.
fn describe_db_error(err: &tokio_postgres::Error) -> String {
    if let Some(db_err) = err.as_db_error() {
        return format!("{} ({})", db_err.message(), db_err.code().code());
    }
    match std::error::Error::source(err) {
        Some(cause) => format!("{err}: {cause}"),
        None => err.to_string(),
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

//! Error types for the employee ledger.

use thiserror::Error;

/// Storage-related errors raised by [`LedgerStore`](crate::store::LedgerStore) backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    /// Wrap a backend failure that has no better classification.
    pub fn backend(context: &str, err: impl std::fmt::Display) -> Self {
        StorageError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{}: {}", context, err),
        ))
    }
}

/// Failure of a single ledger operation.
///
/// Every variant is caught at the handler boundary and rendered as an error envelope;
/// none of them escape [`Dispatcher::invoke`](crate::dispatch::Dispatcher::invoke).
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{operation}: Incorrect number of arguments, expecting {expected}")]
    Arity {
        operation: String,
        expected: usize,
    },

    #[error("{operation}: Invalid numeric argument '{input}': {reason}")]
    Parse {
        operation: String,
        input: String,
        reason: String,
    },

    #[error("Employee already exists with employee ID: {0}")]
    AlreadyExists(String),

    #[error("Employee doesn't exist with employee ID: {0}")]
    NotFound(String),

    #[error("Unsupported method: {0}")]
    UnsupportedOperation(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Query rejected by store: {0}")]
    Query(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl OperationError {
    /// Stable machine-readable code carried in the envelope's `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            OperationError::Arity { .. } => "ARITY",
            OperationError::Parse { .. } => "PARSE",
            OperationError::AlreadyExists(_) => "ALREADY_EXISTS",
            OperationError::NotFound(_) => "NOT_FOUND",
            OperationError::UnsupportedOperation(_) => "UNSUPPORTED_OPERATION",
            OperationError::Serialization(_) => "SERIALIZATION",
            OperationError::Query(_) => "QUERY",
            OperationError::Storage(_) => "STORAGE",
        }
    }
}

impl From<StorageError> for OperationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidQuery(msg) => OperationError::Query(msg),
            other => OperationError::Storage(other),
        }
    }
}

impl From<serde_json::Error> for OperationError {
    fn from(err: serde_json::Error) -> Self {
        OperationError::Serialization(err.to_string())
    }
}

/// Bootstrap errors: configuration, logging and store opening.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

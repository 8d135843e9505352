//! Error types for gamelib

use serde::Serialize;
use thiserror::Error;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error types for catalog and store operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A mandatory field is missing/empty, or a value has the wrong shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// A partial update named none of the schema's fields
    #[error("No fields provided for update.")]
    NoFields,

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// In-process store failure (e.g. a poisoned lock)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Errors the caller caused and can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NoFields | Self::NotFound(_))
    }

    /// HTTP status equivalent of this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::NoFields => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Parse a tokio_postgres error, keeping constraint details readable.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            // not_null_violation / check_violation: the database rejected a value
            if matches!(db_err.code().code(), "23502" | "23514") {
                return Self::Storage(db_err.message().to_string());
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for CatalogError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

/// Outward error body: `{"error": "..."}`.
///
/// Client errors carry their message; store failures are reported with a
/// generic message so driver details do not leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&CatalogError> for ErrorBody {
    fn from(err: &CatalogError) -> Self {
        let error = match err {
            CatalogError::Validation(msg) => msg.clone(),
            CatalogError::NoFields => err.to_string(),
            CatalogError::NotFound(msg) => msg.clone(),
            _ => "An error occurred while processing the request.".to_string(),
        };
        Self { error }
    }
}

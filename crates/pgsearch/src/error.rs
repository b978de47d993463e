//! Error types for pgsearch

use thiserror::Error;

/// Result type alias for pgsearch operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Error types for building and executing searches
#[derive(Debug, Error)]
pub enum SearchError {
    /// A required request parameter is absent or empty
    #[error("Parameter {0} is mandatory")]
    MissingParameter(String),

    /// A request parameter is present but could not be decoded
    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// A date-range endpoint is present but not a `yyyy-MM-dd` date
    #[error("Malformed date for '{key}': expected yyyy-MM-dd, got '{value}'")]
    MalformedDate { key: String, value: String },

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Builder or page request validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    /// Create a missing parameter error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Create an invalid parameter error
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a malformed date error
    pub fn malformed_date(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedDate {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a missing parameter error
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self, Self::MissingParameter(_))
    }

    /// Check if this is a malformed date error
    pub fn is_malformed_date(&self) -> bool {
        matches!(self, Self::MalformedDate { .. })
    }

    /// Whether the error was caused by the caller's input rather than the
    /// database (maps to a 4xx-style response).
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_)
                | Self::InvalidParameter { .. }
                | Self::MalformedDate { .. }
                | Self::Validation(_)
        )
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SearchError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_message() {
        let err = SearchError::missing("branchId");
        assert_eq!(err.to_string(), "Parameter branchId is mandatory");
        assert!(err.is_missing_parameter());
        assert!(err.is_client_fault());
    }

    #[test]
    fn malformed_date_is_client_fault() {
        let err = SearchError::malformed_date("sanctionDateFrom", "2024/01/01");
        assert!(err.is_malformed_date());
        assert!(err.is_client_fault());
        assert!(err.to_string().contains("2024/01/01"));
    }

    #[test]
    fn decode_is_not_client_fault() {
        let err = SearchError::decode("id", "unexpected null");
        assert!(!err.is_client_fault());
    }
}

//! Record source error types
//!
//! Failures raised by a [`RecordSource`](super::RecordSource) while counting,
//! fetching or probing records. The engine never recovers these locally; they
//! surface to the caller as [`Error::SourceUnavailable`](crate::Error::SourceUnavailable).
//!
//! # Example
//!
//! ```rust
//! use shelf_query::source::{SourceError, SourceErrorKind, SourceOperation};
//!
//! let error = SourceError::connection_failed("connection refused")
//!     .with_operation(SourceOperation::Count);
//! assert!(matches!(error.kind, SourceErrorKind::ConnectionFailed));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Operation being performed when the source error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOperation {
    /// Counting records that match the filter
    Count,
    /// Fetching a sorted, windowed page of records
    Fetch,
    /// Probing for a duplicate field value
    Exists,
}

impl fmt::Display for SourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Fetch => write!(f, "fetch"),
            Self::Exists => write!(f, "exists"),
        }
    }
}

/// Category of source error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    /// Failed to reach the backing store
    ConnectionFailed,
    /// The store did not answer in time
    Timeout,
    /// The store rejected or failed the query
    QueryFailed,
    /// A row could not be decoded into the record type
    DecodeFailed,
    /// Other unclassified error
    Other,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::DecodeFailed => write!(f, "decode_failed"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured source error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    /// The operation being performed when the error occurred
    pub operation: SourceOperation,
    /// The category of error
    pub kind: SourceErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl SourceError {
    /// Create a new source error
    pub fn new(
        operation: SourceOperation,
        kind: SourceErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            SourceOperation::Fetch,
            SourceErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Create a timeout error
    pub fn timeout(operation: SourceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, SourceErrorKind::Timeout, message)
    }

    /// Create a query failed error
    pub fn query_failed(operation: SourceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, SourceErrorKind::QueryFailed, message)
    }

    /// Create a decode failed error
    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self::new(SourceOperation::Fetch, SourceErrorKind::DecodeFailed, message)
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: SourceOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            SourceErrorKind::ConnectionFailed | SourceErrorKind::Timeout
        )
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for SourceError {}

#[cfg(feature = "database")]
impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        match err {
            E::PoolTimedOut => Self::timeout(SourceOperation::Fetch, "Connection pool timed out"),
            E::PoolClosed => Self::connection_failed("Connection pool is closed"),
            E::Io(e) => Self::connection_failed(e.to_string()),
            E::Tls(e) => Self::connection_failed(format!("TLS error: {}", e)),
            E::ColumnNotFound(col) => Self::query_failed(
                SourceOperation::Fetch,
                format!("Column not found: {}", col),
            ),
            E::ColumnDecode { index, source } => {
                Self::decode_failed(format!("Failed to decode column {}: {}", index, source))
            }
            E::Decode(e) => Self::decode_failed(e.to_string()),
            E::Database(e) => Self::query_failed(SourceOperation::Fetch, e.to_string()),
            other => Self::new(
                SourceOperation::Fetch,
                SourceErrorKind::Other,
                other.to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_operation_display() {
        assert_eq!(format!("{}", SourceOperation::Count), "count");
        assert_eq!(format!("{}", SourceOperation::Fetch), "fetch");
        assert_eq!(format!("{}", SourceOperation::Exists), "exists");
    }

    #[test]
    fn test_with_operation() {
        let error = SourceError::connection_failed("refused").with_operation(SourceOperation::Count);
        assert_eq!(error.operation, SourceOperation::Count);
        assert_eq!(error.kind, SourceErrorKind::ConnectionFailed);
    }

    #[test]
    fn test_is_retriable() {
        assert!(SourceError::connection_failed("reset").is_retriable());
        assert!(SourceError::timeout(SourceOperation::Count, "30s").is_retriable());
        assert!(!SourceError::query_failed(SourceOperation::Fetch, "syntax").is_retriable());
        assert!(!SourceError::decode_failed("bad numeric").is_retriable());
    }

    #[test]
    fn test_display() {
        let error = SourceError::query_failed(SourceOperation::Count, "relation missing");
        let display = error.to_string();
        assert!(display.contains("query_failed"));
        assert!(display.contains("count"));
        assert!(display.contains("relation missing"));
    }
}

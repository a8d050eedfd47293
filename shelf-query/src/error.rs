//! Error types and HTTP response conversion

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::source::SourceError;

/// Result type alias using the engine error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the paging engine
///
/// `InvalidColumn` and `InvalidPaging` are always raised before the record
/// source is touched. `SourceUnavailable` carries the store failure unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// A sort, filter or duplicate-check column is not an eligible field of the record type
    #[error("Invalid column '{column}' for {record}")]
    InvalidColumn {
        /// Record type the column was checked against
        record: &'static str,
        /// Column name exactly as the caller supplied it
        column: String,
    },

    /// Page index or page size is out of range
    #[error("Invalid paging (pageIndex={page_index}, pageSize={page_size}): {reason}")]
    InvalidPaging {
        /// Requested page index
        page_index: i64,
        /// Requested page size
        page_size: i64,
        /// Which bound was violated
        reason: &'static str,
    },

    /// The record source failed during count, fetch or exists
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid_column(record: &'static str, column: impl Into<String>) -> Self {
        Self::InvalidColumn {
            record,
            column: column.into(),
        }
    }

    /// True for errors caused by caller input rather than the store or deployment
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidColumn { .. } | Self::InvalidPaging { .. })
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidColumn { .. } => "INVALID_COLUMN",
            Self::InvalidPaging { .. } => "INVALID_PAGING",
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Self::Config(_) | Self::InvalidConfig(_) => "CONFIG_ERROR",
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(status: u16, code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            Error::InvalidColumn { .. } | Error::InvalidPaging { .. } => StatusCode::BAD_REQUEST,
            Error::SourceUnavailable(e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    retriable = e.is_retriable(),
                    "Record source error: {}", e.message
                );
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::Config(_) | Error::InvalidConfig(_) => {
                tracing::error!("Configuration error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store and config details stay in the logs
        let message = if self.is_client_error() {
            self.to_string()
        } else if matches!(self, Error::SourceUnavailable(_)) {
            "Record source unavailable".to_string()
        } else {
            "Internal server error".to_string()
        };

        let body = ErrorResponse::with_code(status.as_u16(), self.code(), message);
        (status, axum::Json(body)).into_response()
    }
}

//! Error types for the publication sync utility.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Per-record lookup problems are *not* errors at this level; operations collect them
//! into their reports and keep going. Only dataset-level and whole-batch problems
//! surface as `Err`.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the OpenAlex API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Work not found (404 response)
    #[error("Work not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Identifier does not match any recognized scheme (PMID, PMCID, DOI, OpenAlex)
    #[error("Unrecognized identifier format: {id}")]
    InvalidId {
        /// The offending identifier
        id: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create an invalid identifier error.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if the failure is in reaching the source rather than in
    /// what was asked of it. A batch where every lookup fails this way is
    /// treated as the source being down.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Middleware(_)
                | Self::Timeout(_)
                | Self::RateLimited { .. }
                | Self::Server { .. }
        )
    }
}

/// A work response that cannot be mapped into a publication record.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// A field the record schema requires was absent from the response
    #[error("work for {id} is missing required field '{field}'")]
    MissingField {
        /// Identifier the work was fetched for
        id: String,
        /// Name of the absent field
        field: String,
    },
}

impl RecordError {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField { id: id.into(), field: field.into() }
    }
}

/// Errors from the dataset directory adapter.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Dataset directory missing or not a directory
    #[error("dataset directory not found: {0}")]
    DirNotFound(PathBuf),

    /// Records file missing from the dataset directory
    #[error("records file not found: {0}")]
    RecordsNotFound(PathBuf),

    /// Manifest file missing from the dataset directory
    #[error("identifier manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// Records file exists but does not parse
    #[error("corrupt records file {path}: {source}")]
    Corrupt {
        /// Path to the unparseable file
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Two records share an identifier
    #[error("duplicate identifier in dataset: {id}")]
    DuplicateId {
        /// The repeated identifier
        id: String,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while committing
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fatal errors from a sync operation. Per-record failures live in the reports.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// Dataset could not be read or written
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Every lookup in the batch failed at the transport level
    #[error("source unreachable: all {attempted} lookups failed")]
    SourceUnreachable {
        /// Number of lookups attempted
        attempted: usize,
    },
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_transport_classification() {
        assert!(ClientError::rate_limited(60).is_transport());
        assert!(ClientError::Timeout(Duration::from_secs(30)).is_transport());
        assert!(ClientError::server(500, "Internal error").is_transport());

        assert!(!ClientError::not_found("pmid:123").is_transport());
        assert!(!ClientError::bad_request("invalid select").is_transport());
        assert!(!ClientError::invalid_id("??").is_transport());
    }

    #[test]
    fn test_record_error_display() {
        let err = RecordError::missing_field("38857748", "title");
        let msg = err.to_string();
        assert!(msg.contains("38857748"));
        assert!(msg.contains("title"));
    }

    #[test]
    fn test_sync_error_wraps_dataset_error() {
        let err = SyncError::from(DatasetError::DuplicateId { id: "W123".to_string() });
        assert!(err.to_string().contains("W123"));
    }
}

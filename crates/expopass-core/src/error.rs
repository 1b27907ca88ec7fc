// Error types for the scan pipeline

use thiserror::Error;

use crate::domain::UserCategory;

/// Result type alias for scan pipeline operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while processing a scan
#[derive(Debug, Error)]
pub enum ScanError {
    /// Camera acquisition or capture error
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// Payload failed to parse or sanitize (terminal for this scan attempt)
    #[error("invalid badge payload: {0}")]
    PayloadFormat(String),

    /// No record matched after all lookup fallbacks (terminal)
    #[error("attendee not found: {0}")]
    NotFound(String),

    /// Backend/connectivity failure during a mutation (retryable)
    #[error("backend error: {0}")]
    Backend(String),

    /// Resolver did not finish within the processing timeout (recoverable,
    /// the scan session stays open)
    #[error("scan processing timed out")]
    Timeout,

    /// The scanner's role has no scan action
    #[error("scanning is not supported for role {0}")]
    UnsupportedRole(UserCategory),
}

impl ScanError {
    /// Create a payload format error
    pub fn format(msg: impl Into<String>) -> Self {
        ScanError::PayloadFormat(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        ScanError::Backend(msg.into())
    }
}

impl From<StoreError> for ScanError {
    fn from(err: StoreError) -> Self {
        ScanError::Backend(err.to_string())
    }
}

/// Camera acquisition errors, one per remediation path shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera permission denied - allow camera access and try again")]
    PermissionDenied,

    #[error("no camera device available")]
    NoCamera,

    #[error("camera is busy - close other applications using it")]
    Busy,

    #[error("camera capture is not supported on this device")]
    Unsupported,
}

/// Errors surfaced by ScanStore implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected an ordered/limited query (the missing
    /// composite index case); callers fall back to an unordered fetch
    /// with client-side sorting
    #[error("ordered query not supported by this store")]
    UnsupportedQuery,

    /// Any other storage failure
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

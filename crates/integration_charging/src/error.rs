//! Station directory error types

use thiserror::Error;

/// Errors that can occur during station searches
#[derive(Debug, Error)]
pub enum StationError {
    /// Connection to the station directory failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the station directory failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the station directory
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by the API)
        retry_after_secs: Option<u64>,
    },

    /// API key missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Search parameters were rejected before sending
    #[error("Invalid search: {0}")]
    InvalidSearch(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl StationError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

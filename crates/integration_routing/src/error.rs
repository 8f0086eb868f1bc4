//! Routing error types

use thiserror::Error;

/// Errors that can occur during route lookups
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the routing service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by the server)
        retry_after_secs: Option<u64>,
    },

    /// The routing engine found no road connection
    #[error("No route: {0}")]
    NoRoute(String),

    /// Fewer than two points, or a malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
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

    /// Map an OSRM response `code` other than `Ok` to an error
    pub(crate) fn from_api_code(code: &str, message: Option<String>) -> Self {
        let detail = message.unwrap_or_else(|| code.to_string());
        match code {
            "NoRoute" | "NoSegment" | "NoMatch" => Self::NoRoute(detail),
            "InvalidQuery" | "InvalidValue" | "InvalidUrl" | "InvalidOptions" | "TooBig" => {
                Self::InvalidRequest(detail)
            },
            _ => Self::RequestFailed(format!("{code}: {detail}")),
        }
    }
}

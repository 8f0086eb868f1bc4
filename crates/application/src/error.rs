//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The routing provider could not produce a route
    #[error("No route found from {from} to {to}")]
    RouteNotFound {
        /// Origin description
        from: String,
        /// Destination description
        to: String,
    },

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ExternalService(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::RateLimited.is_retryable());
        assert!(ApplicationError::ExternalService("osrm down".to_string()).is_retryable());
        assert!(!ApplicationError::Configuration("bad".to_string()).is_retryable());
        assert!(
            !ApplicationError::RouteNotFound {
                from: "A".to_string(),
                to: "B".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError =
            DomainError::ValidationError("current battery must be within 0-100".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Validation failed: current battery must be within 0-100"
        );
    }

    #[test]
    fn route_not_found_message() {
        let err = ApplicationError::RouteNotFound {
            from: "Reno".to_string(),
            to: "Honolulu".to_string(),
        };
        assert!(err.to_string().contains("Reno"));
        assert!(err.to_string().contains("Honolulu"));
    }
}

//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A location that must be geocoded has no coordinates
    #[error("Location has no coordinates: {0}")]
    MissingCoordinates(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a missing-coordinates error for a named location
    pub fn missing_coordinates(name: impl Into<String>) -> Self {
        Self::MissingCoordinates(name.into())
    }
}

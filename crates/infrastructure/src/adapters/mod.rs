//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod circuit_breaker;
mod routing_adapter;
mod station_directory_adapter;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitOpenError, CircuitState,
};
pub use routing_adapter::RoutingAdapter;
pub use station_directory_adapter::StationDirectoryAdapter;

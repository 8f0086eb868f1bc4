//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the OSRM, Nominatim and
//! Open Charge Map clients, and owns configuration loading and logging.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::build_planner;
pub use config::{AppConfig, ConfigError};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging, log_filter_from_verbosity};

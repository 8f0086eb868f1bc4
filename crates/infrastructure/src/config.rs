//! Application configuration
//!
//! Sections:
//! - `routing`: OSRM route service
//! - `geocoding`: Nominatim address lookup
//! - `stations`: Open Charge Map directory
//! - `planner`: search radius, power floor and battery defaults
//! - `logging`: log level and output format
//! - `circuit_breaker`: station directory failure handling
//!
//! Values are layered: built-in defaults, then `config.toml` (or an explicit
//! path), then `EVROUTE__<SECTION>__<KEY>` environment variables.

use std::path::Path;

use application::PlannerConfig;
use integration_charging::OpenChargeMapConfig;
use integration_routing::{NominatimConfig, OsrmConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{adapters::CircuitBreakerConfig, telemetry::LoggingConfig};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "EVROUTE";

/// Separator between prefix, section and key in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A section failed validation
    #[error("Invalid [{section}] configuration: {reason}")]
    Invalid {
        /// Section name
        section: &'static str,
        /// What was wrong
        reason: String,
    },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Route service settings
    #[serde(default)]
    pub routing: OsrmConfig,

    /// Geocoder settings
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Station directory settings
    #[serde(default)]
    pub stations: OpenChargeMapConfig,

    /// Planner tuning
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Circuit breaker in front of the station directory
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Without `path`, a `config.{toml,yaml,json}` in the working directory is
    /// used if present. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(Self::environment());

        Self::build(builder)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            routing = %config.routing.base_url,
            stations = %config.stations.base_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |section: &'static str| {
            move |reason: String| ConfigError::Invalid { section, reason }
        };

        self.routing.validate().map_err(invalid("routing"))?;
        self.geocoding.validate().map_err(invalid("geocoding"))?;
        self.stations.validate().map_err(invalid("stations"))?;
        self.planner.validate().map_err(invalid("planner"))?;
        self.logging.validate().map_err(invalid("logging"))?;
        self.circuit_breaker
            .validate()
            .map_err(invalid("circuit_breaker"))?;
        Ok(())
    }
}

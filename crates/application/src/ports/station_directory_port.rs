//! Charging station directory port
//!
//! Defines the interface for searching charging stations around a point.

use async_trait::async_trait;
use domain::{ChargingNetwork, ChargingStation, GeoLocation};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Parameters of a single station search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationQuery {
    /// Search center
    pub center: GeoLocation,
    /// Search radius in miles
    pub radius_miles: f64,
    /// Only return stations rated at least this many kW
    pub min_power_kw: Option<f64>,
    /// Only return stations on these networks
    pub networks: Option<Vec<ChargingNetwork>>,
    /// Only return operational stations
    pub operational_only: bool,
}

impl StationQuery {
    /// Create a query for operational stations of any power and network
    #[must_use]
    pub const fn new(center: GeoLocation, radius_miles: f64) -> Self {
        Self {
            center,
            radius_miles,
            min_power_kw: None,
            networks: None,
            operational_only: true,
        }
    }

    /// Set the minimum power filter
    #[must_use]
    pub const fn with_min_power(mut self, min_power_kw: Option<f64>) -> Self {
        self.min_power_kw = min_power_kw;
        self
    }

    /// Set the network allow-list; an empty list means no filter
    #[must_use]
    pub fn with_networks(mut self, networks: Option<Vec<ChargingNetwork>>) -> Self {
        self.networks = networks.filter(|n| !n.is_empty());
        self
    }

    /// Include stations that are not operational
    #[must_use]
    pub const fn including_offline(mut self) -> Self {
        self.operational_only = false;
        self
    }
}

/// Port for charging station directories
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationDirectoryPort: Send + Sync {
    /// Stations matching `query`.
    ///
    /// Callers treat an error like an empty result; it never aborts a plan.
    async fn search_stations(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<ChargingStation>, ApplicationError>;

    /// Check if the station directory is reachable
    async fn is_available(&self) -> bool;
}

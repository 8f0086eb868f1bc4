//! Station search parameters

use domain::{ChargingNetwork, ChargingStation, GeoLocation};
use serde::{Deserialize, Serialize};

/// A station search around a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSearch {
    /// Search center
    pub center: GeoLocation,
    /// Search radius in miles
    pub radius_miles: f64,
    /// Minimum rated power in kW
    #[serde(default)]
    pub min_power_kw: Option<f64>,
    /// Network allow-list; empty means any network
    #[serde(default)]
    pub networks: Vec<ChargingNetwork>,
    /// Drop stations that are not operational
    #[serde(default = "default_operational_only")]
    pub operational_only: bool,
}

const fn default_operational_only() -> bool {
    true
}

impl StationSearch {
    /// Search for operational stations of any network and power
    #[must_use]
    pub const fn new(center: GeoLocation, radius_miles: f64) -> Self {
        Self {
            center,
            radius_miles,
            min_power_kw: None,
            networks: Vec::new(),
            operational_only: true,
        }
    }

    /// Require at least `min_power_kw`
    #[must_use]
    pub const fn with_min_power(mut self, min_power_kw: f64) -> Self {
        self.min_power_kw = Some(min_power_kw);
        self
    }

    /// Restrict to these networks
    #[must_use]
    pub fn with_networks(mut self, networks: Vec<ChargingNetwork>) -> Self {
        self.networks = networks;
        self
    }

    /// Keep stations that are not operational
    #[must_use]
    pub const fn including_offline(mut self) -> Self {
        self.operational_only = false;
        self
    }

    /// Cache key; coordinates rounded to ~100 m so nearby searches share entries
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut networks: Vec<&str> = self.networks.iter().map(ChargingNetwork::label).collect();
        networks.sort_unstable();
        format!(
            "{:.3},{:.3}|{:.1}|{:?}|{}|{}",
            self.center.latitude(),
            self.center.longitude(),
            self.radius_miles,
            self.min_power_kw,
            networks.join("+"),
            self.operational_only
        )
    }

    /// Whether `station` passes the operational, network and power filters
    #[must_use]
    pub fn matches(&self, station: &ChargingStation) -> bool {
        if self.operational_only && !station.available {
            return false;
        }
        if !self.networks.is_empty() && !self.networks.contains(&station.network) {
            return false;
        }
        self.min_power_kw
            .is_none_or(|min_power| station.power_kw >= min_power)
    }
}

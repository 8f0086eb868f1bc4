//! Charging station entity

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Location;
use crate::value_objects::{ChargingNetwork, GeoLocation};

/// A public charging station
///
/// Identity is `id`: two records with the same id returned by different
/// searches describe the same station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    /// Stable identifier from the station directory
    pub id: String,
    /// Station name
    pub name: String,
    /// Where the station is
    pub location: Location,
    /// Operating network
    #[serde(default)]
    pub network: ChargingNetwork,
    /// Highest rated power across the station's connectors, in kW
    pub power_kw: f64,
    /// Connector type labels (e.g. "CCS (Type 1)", "NACS / Tesla Supercharger")
    #[serde(default)]
    pub connector_types: Vec<String>,
    /// Whether the station is currently operational
    pub available: bool,
    /// Distance from the search point in miles, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

impl ChargingStation {
    /// Create an available station with no connectors and unknown distance
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Location,
        network: ChargingNetwork,
        power_kw: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            network,
            power_kw,
            connector_types: Vec::new(),
            available: true,
            distance_miles: None,
        }
    }

    /// Set the connector labels
    #[must_use]
    pub fn with_connectors<I, S>(mut self, connectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connector_types = connectors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the distance from the search point
    #[must_use]
    pub fn with_distance(mut self, miles: f64) -> Self {
        self.distance_miles = Some(miles);
        self
    }

    /// Mark the station as out of service
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Station coordinates, if known
    #[must_use]
    pub fn coordinates(&self) -> Option<GeoLocation> {
        self.location.coordinates()
    }

    /// Whether this station is a DC fast charger (50 kW or more)
    #[must_use]
    pub fn is_fast_charger(&self) -> bool {
        self.power_kw >= 50.0
    }
}

impl fmt::Display for ChargingStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {:.0} kW)", self.name, self.network, self.power_kw)?;
        if let Some(distance) = self.distance_miles {
            write!(f, " {distance:.1} mi")?;
        }
        Ok(())
    }
}

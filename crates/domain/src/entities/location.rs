//! Named location entity

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::GeoLocation;

/// A named place on a trip
///
/// Coordinates are optional: user input may only carry an address until it
/// has been geocoded. Anything without coordinates cannot take part in
/// distance math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name
    pub name: String,
    /// Postal address or free-form description
    #[serde(default)]
    pub address: String,
    /// Latitude in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// Create a location from a name and address, without coordinates
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// Create a location at a known point, named after its coordinates
    #[must_use]
    pub fn at(point: GeoLocation) -> Self {
        Self {
            name: point.to_string(),
            address: String::new(),
            latitude: Some(point.latitude()),
            longitude: Some(point.longitude()),
        }
    }

    /// Attach coordinates
    #[must_use]
    pub fn with_coords(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Coordinates, if both are present and in range
    #[must_use]
    pub fn coordinates(&self) -> Option<GeoLocation> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoLocation::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// Address if set, otherwise the name; used as a geocoding query
    #[must_use]
    pub fn query_text(&self) -> &str {
        if self.address.trim().is_empty() {
            &self.name
        } else {
            &self.address
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

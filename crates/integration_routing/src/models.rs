//! Routing data models
//!
//! Typed representations of OSRM routes, legs, steps and snapped waypoints.

use std::fmt;

use domain::{GeoLocation, METERS_PER_MILE};
use serde::{Deserialize, Serialize};

/// Result of a route request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteResponse {
    /// Candidate routes, best first
    pub routes: Vec<Route>,
    /// Input points snapped to the road network, in request order
    pub waypoints: Vec<Waypoint>,
}

impl RouteResponse {
    /// The best route, if any
    #[must_use]
    pub fn best(&self) -> Option<&Route> {
        self.routes.first()
    }
}

/// A complete route through all requested points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
    /// One leg per pair of consecutive waypoints
    pub legs: Vec<WaypointLeg>,
}

impl Route {
    /// Format as a compact one-line summary
    #[must_use]
    pub fn format_summary(&self) -> String {
        let minutes = (self.duration_seconds / 60.0).round();
        format!(
            "{:.1} mi, {minutes:.0} min, {} leg(s)",
            self.distance_meters / METERS_PER_MILE,
            self.legs.len()
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}

/// Route section between two consecutive waypoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaypointLeg {
    /// Distance in meters
    pub distance_meters: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Names of the major roads used
    #[serde(default)]
    pub summary: String,
    /// Turn-by-turn steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A single maneuver-to-maneuver step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Where the step begins
    pub start: GeoLocation,
    /// Where the step ends
    pub end: GeoLocation,
    /// Distance in meters
    pub distance_meters: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Road name (may be empty)
    #[serde(default)]
    pub road_name: String,
    /// Maneuver type (`depart`, `turn`, `arrive`, ...)
    #[serde(default)]
    pub maneuver: String,
}

/// An input point snapped to the road network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    /// Name of the road the point snapped to
    #[serde(default)]
    pub name: String,
    /// Snapped position
    pub location: GeoLocation,
    /// Distance from the input point to the snapped position, in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_distance_meters: Option<f64>,
}

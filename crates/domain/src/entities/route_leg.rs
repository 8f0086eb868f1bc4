//! Route geometry as produced by a routing provider

use serde::{Deserialize, Serialize};

use super::Location;
use crate::value_objects::GeoLocation;

/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// A turn-by-turn step inside a leg; only used to sample the route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Where the step begins
    pub start: GeoLocation,
    /// Where the step ends
    pub end: GeoLocation,
}

impl RouteStep {
    /// Create a step
    #[must_use]
    pub const fn new(start: GeoLocation, end: GeoLocation) -> Self {
        Self { start, end }
    }
}

/// One origin-to-destination segment of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Leg start
    pub start: Location,
    /// Leg end
    pub end: Location,
    /// Driving distance in meters
    pub distance_meters: f64,
    /// Driving time in seconds
    pub duration_seconds: f64,
    /// Finer-grained steps
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

impl RouteLeg {
    /// Create a leg without steps
    #[must_use]
    pub const fn new(
        start: Location,
        end: Location,
        distance_meters: f64,
        duration_seconds: f64,
    ) -> Self {
        Self {
            start,
            end,
            distance_meters,
            duration_seconds,
            steps: Vec::new(),
        }
    }

    /// Attach steps
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<RouteStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Distance in miles
    #[must_use]
    pub fn distance_miles(&self) -> f64 {
        self.distance_meters / METERS_PER_MILE
    }

    /// Duration in minutes
    #[must_use]
    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }
}

//! Drive Simulator
//!
//! Walks the route legs in order, tracking battery percentage, and inserts a
//! charging stop at the nearest available station whenever the next leg would
//! take the battery below the safety threshold. A single forward pass: no
//! lookahead, no backtracking, same output for the same input.

use domain::geodesy::closest;
use domain::{
    ChargingStation, ChargingStop, ItineraryLeg, LegKind, Location, RouteLeg, VehicleProfile,
    charge_minutes,
};
use tracing::{debug, info, warn};

/// Result of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Driving and charging legs in travel order
    pub legs: Vec<ItineraryLeg>,
    /// Stops inserted along the way
    pub charging_stops: Vec<ChargingStop>,
    /// Battery percentage on arrival at the destination
    pub final_battery: f64,
}

/// Mutable state of a run; lives only inside [`DriveSimulator::run`]
#[derive(Debug)]
struct SimulationState {
    battery: f64,
    location: Location,
}

/// Forward-only battery simulation over a route
#[derive(Debug, Clone, Copy)]
pub struct DriveSimulator {
    vehicle: VehicleProfile,
}

impl DriveSimulator {
    /// Create a simulator for a vehicle
    #[must_use]
    pub const fn new(vehicle: VehicleProfile) -> Self {
        Self { vehicle }
    }

    /// The vehicle being simulated
    #[must_use]
    pub const fn vehicle(&self) -> &VehicleProfile {
        &self.vehicle
    }

    /// Simulate driving `route` starting at `starting_battery` percent.
    ///
    /// When a required stop has no available station with coordinates, the
    /// leg is driven anyway and may end below the safety threshold.
    #[must_use]
    pub fn run(
        &self,
        route: &[RouteLeg],
        stations: &[ChargingStation],
        starting_battery: f64,
    ) -> SimulationOutcome {
        let starting_battery = starting_battery.clamp(0.0, 100.0);
        let Some(first) = route.first() else {
            return SimulationOutcome {
                legs: Vec::new(),
                charging_stops: Vec::new(),
                final_battery: starting_battery,
            };
        };

        let mut state = SimulationState {
            battery: starting_battery,
            location: first.start.clone(),
        };
        let mut legs = Vec::with_capacity(route.len());
        let mut charging_stops = Vec::new();
        let threshold = self.vehicle.safety_threshold();

        for (index, leg) in route.iter().enumerate() {
            let miles = leg.distance_miles();
            let minutes = leg.duration_minutes();
            let battery_needed = self.vehicle.battery_needed(miles);

            if state.battery - battery_needed < threshold {
                match self.nearest_available(&state.location, stations) {
                    Some(station) => {
                        let (stop, charging_leg) = self.charge_at(&mut state, station);
                        charging_stops.push(stop);
                        legs.push(charging_leg);
                    },
                    None => warn!(
                        leg = index,
                        battery = state.battery,
                        battery_needed,
                        "Charging required but no station available, driving on"
                    ),
                }
            }

            state.battery = (state.battery - battery_needed).max(0.0);
            debug!(
                leg = index,
                miles,
                battery_needed,
                battery = state.battery,
                "Drove leg"
            );

            legs.push(ItineraryLeg {
                kind: LegKind::Driving,
                from: leg.start.clone(),
                to: leg.end.clone(),
                distance_miles: miles,
                duration_minutes: minutes,
                battery_used: battery_needed,
                battery_remaining: state.battery,
            });
            state.location = leg.end.clone();
        }

        SimulationOutcome {
            legs,
            charging_stops,
            final_battery: state.battery,
        }
    }

    fn nearest_available<'a>(
        &self,
        location: &Location,
        stations: &'a [ChargingStation],
    ) -> Option<&'a ChargingStation> {
        let point = location.coordinates()?;
        closest(&point, stations.iter().filter(|station| station.available))
    }

    fn charge_at(
        &self,
        state: &mut SimulationState,
        station: &ChargingStation,
    ) -> (ChargingStop, ItineraryLeg) {
        let charge_needed = self.vehicle.max_battery - state.battery;
        let charge_time = charge_minutes(charge_needed, station.power_kw);

        info!(
            station = %station.name,
            arrival_battery = state.battery,
            charge_time,
            "Inserted charging stop"
        );

        let stop = ChargingStop {
            station: station.clone(),
            arrival_battery: state.battery.round(),
            departure_battery: self.vehicle.max_battery,
            charge_time_minutes: charge_time,
        };
        let leg = ItineraryLeg {
            kind: LegKind::Charging,
            from: state.location.clone(),
            to: station.location.clone(),
            distance_miles: 0.0,
            duration_minutes: f64::from(charge_time),
            battery_used: 0.0,
            battery_remaining: self.vehicle.max_battery,
        };

        state.battery = self.vehicle.max_battery;
        state.location = station.location.clone();
        (stop, leg)
    }
}

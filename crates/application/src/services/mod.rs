//! Application services - Use case implementations

mod drive_simulator;
mod station_aggregator;
mod trip_planner;

pub use drive_simulator::{DriveSimulator, SimulationOutcome};
pub use station_aggregator::{
    MAX_SEARCH_POINTS, MAX_STEP_SAMPLES, RouteStationAggregator, merge_station_batches,
    route_sample_points, select_search_points,
};
pub use trip_planner::{PlanRequest, PlannerConfig, ServiceStatus, TripPlannerService};

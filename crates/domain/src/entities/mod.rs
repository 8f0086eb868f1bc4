//! Domain entities - Objects with identity and lifecycle

mod charging_station;
mod itinerary;
mod location;
mod route_leg;

pub use charging_station::ChargingStation;
pub use itinerary::{ChargingStop, ItineraryLeg, LegKind, RoutePlan};
pub use location::Location;
pub use route_leg::{METERS_PER_MILE, RouteLeg, RouteStep};

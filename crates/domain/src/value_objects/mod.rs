//! Value Objects - Immutable, identity-less domain primitives

mod charging_network;
mod geo_location;
mod vehicle_profile;

pub use charging_network::ChargingNetwork;
pub use geo_location::{EARTH_RADIUS_KM, EARTH_RADIUS_MILES, GeoLocation, InvalidCoordinates};
pub use vehicle_profile::{
    DEFAULT_EFFICIENCY_FACTOR, DEFAULT_MAX_BATTERY, DEFAULT_MIN_BATTERY, DEFAULT_SAFETY_BUFFER,
    VehicleProfile,
};

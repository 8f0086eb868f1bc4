//! Domain layer for EV trip planning
//!
//! Contains the ubiquitous language of the planner: coordinates, stations,
//! route legs, itineraries and the vehicle energy model, plus the pure
//! computations on them (great-circle distance, nearest station, charge time).
//! This layer performs no I/O.

pub mod charging;
pub mod entities;
pub mod errors;
pub mod geodesy;
pub mod value_objects;

pub use charging::charge_minutes;
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;

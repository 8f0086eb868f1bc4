//! Port definitions for application layer
//!
//! Ports are interfaces that define how the planner talks to its two external
//! collaborators: a routing engine and a charging station directory. Adapters
//! in the infrastructure layer implement these ports.

mod route_geometry_port;
mod station_directory_port;

#[cfg(test)]
pub use route_geometry_port::MockRouteGeometryPort;
pub use route_geometry_port::RouteGeometryPort;
#[cfg(test)]
pub use station_directory_port::MockStationDirectoryPort;
pub use station_directory_port::{StationDirectoryPort, StationQuery};

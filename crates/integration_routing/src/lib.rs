//! Road routing integration for evroute
//!
//! Provides driving routes via the [OSRM](https://project-osrm.org) route
//! service and address geocoding via
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! [`RoutingClient`] defines the interface for route lookups, implemented by
//! [`OsrmRoutingClient`]. [`GeocodingClient`] handles address-to-coordinate
//! conversion via [`NominatimGeocodingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::GeoLocation;
//! use integration_routing::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//!
//! let response = client
//!     .route(&[GeoLocation::los_angeles(), GeoLocation::san_francisco()])
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{OsrmRoutingClient, RoutingClient};
pub use config::OsrmConfig;
pub use error::RoutingError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
pub use models::{Route, RouteResponse, Step, Waypoint, WaypointLeg};

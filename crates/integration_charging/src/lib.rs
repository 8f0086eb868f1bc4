//! Charging station directory integration for evroute
//!
//! Searches public charging stations around a point via the
//! [Open Charge Map](https://openchargemap.org/site/develop/api) API and maps
//! them onto the domain's [`domain::ChargingStation`].
//!
//! # Architecture
//!
//! [`StationDirectoryClient`] defines the search interface, implemented by
//! [`OpenChargeMapClient`]. The client applies the operational, network and
//! power filters locally and trims results to the requested radius, so the
//! same [`StationSearch`] gives the same answer whatever the upstream honours.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::GeoLocation;
//! use integration_charging::{OpenChargeMapClient, OpenChargeMapConfig, StationSearch};
//!
//! let client = OpenChargeMapClient::new(&OpenChargeMapConfig::default())?;
//! let stations = client
//!     .search(&StationSearch::new(GeoLocation::denver(), 25.0).with_min_power(50.0))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{OpenChargeMapClient, StationDirectoryClient};
pub use config::OpenChargeMapConfig;
pub use error::StationError;
pub use models::StationSearch;

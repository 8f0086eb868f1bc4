//! Route geometry port
//!
//! Defines how the planner obtains driving legs between an origin, a
//! destination and intermediate waypoints. Adapters in the infrastructure
//! layer implement this port on top of a routing engine.

use async_trait::async_trait;
use domain::{Location, RouteLeg};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for route geometry providers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RouteGeometryPort: Send + Sync {
    /// Ordered legs from `origin` through `waypoints` to `destination`.
    ///
    /// Failure is fatal for planning; implementations must not fall back to
    /// an empty route.
    async fn route(
        &self,
        origin: &Location,
        destination: &Location,
        waypoints: &[Location],
    ) -> Result<Vec<RouteLeg>, ApplicationError>;

    /// Check if the routing service is reachable
    async fn is_available(&self) -> bool;
}

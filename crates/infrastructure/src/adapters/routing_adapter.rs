//! Routing adapter - Implements RouteGeometryPort using integration_routing

use std::sync::Arc;

use application::{error::ApplicationError, ports::RouteGeometryPort};
use async_trait::async_trait;
use domain::{DomainError, GeoLocation, Location, RouteLeg, RouteStep};
use integration_routing::{
    GeocodingClient, GeocodingError, RoutingClient, RoutingError, WaypointLeg,
};
use tracing::{debug, instrument, warn};

/// Adapter turning OSRM routes into planner legs
///
/// Stops without coordinates are geocoded from their address (or name)
/// before the route request is sent.
pub struct RoutingAdapter {
    routing: Arc<dyn RoutingClient>,
    geocoder: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for RoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter")
            .field("routing", &"dyn RoutingClient")
            .field("geocoder", &"dyn GeocodingClient")
            .finish()
    }
}

impl RoutingAdapter {
    /// Create a new routing adapter
    #[must_use]
    pub fn new(routing: Arc<dyn RoutingClient>, geocoder: Arc<dyn GeocodingClient>) -> Self {
        Self { routing, geocoder }
    }

    /// Fill in coordinates for `location` if it has none
    async fn resolve(&self, location: &Location) -> Result<Location, ApplicationError> {
        if location.coordinates().is_some() {
            return Ok(location.clone());
        }

        let query = location.query_text();
        debug!(query, "Geocoding stop without coordinates");

        let point = self
            .geocoder
            .geocode(query)
            .await
            .map_err(|e| Self::map_geocoding_error(location, e))?;

        Ok(location
            .clone()
            .with_coords(point.latitude(), point.longitude()))
    }

    fn map_geocoding_error(location: &Location, err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::AddressNotFound(_) => {
                DomainError::missing_coordinates(location.name.as_str()).into()
            },
            GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
            e => ApplicationError::ExternalService(format!("Geocoding failed: {e}")),
        }
    }

    fn map_routing_error(
        origin: &Location,
        destination: &Location,
        err: RoutingError,
    ) -> ApplicationError {
        match err {
            RoutingError::NoRoute(reason) => {
                debug!(%reason, "Router found no route");
                ApplicationError::RouteNotFound {
                    from: origin.to_string(),
                    to: destination.to_string(),
                }
            },
            RoutingError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            e => ApplicationError::ExternalService(format!("Routing failed: {e}")),
        }
    }

    fn convert_leg(start: Location, end: Location, leg: &WaypointLeg) -> RouteLeg {
        let steps = leg
            .steps
            .iter()
            .map(|step| RouteStep::new(step.start, step.end))
            .collect();

        RouteLeg::new(start, end, leg.distance_meters, leg.duration_seconds).with_steps(steps)
    }
}

#[async_trait]
impl RouteGeometryPort for RoutingAdapter {
    #[instrument(skip(self, waypoints), fields(from = %origin, to = %destination, waypoints = waypoints.len()))]
    async fn route(
        &self,
        origin: &Location,
        destination: &Location,
        waypoints: &[Location],
    ) -> Result<Vec<RouteLeg>, ApplicationError> {
        let mut stops = Vec::with_capacity(waypoints.len() + 2);
        stops.push(self.resolve(origin).await?);
        for waypoint in waypoints {
            stops.push(self.resolve(waypoint).await?);
        }
        stops.push(self.resolve(destination).await?);

        let points: Vec<GeoLocation> = stops.iter().filter_map(Location::coordinates).collect();
        if points.len() != stops.len() {
            return Err(ApplicationError::Internal(
                "stop lost its coordinates after geocoding".to_string(),
            ));
        }

        let response = self
            .routing
            .route(&points)
            .await
            .map_err(|e| Self::map_routing_error(origin, destination, e))?;

        let Some(route) = response.best() else {
            return Ok(Vec::new());
        };

        let expected = stops.len() - 1;
        if route.legs.len() != expected {
            warn!(
                expected,
                actual = route.legs.len(),
                "Router returned an unexpected number of legs"
            );
            return Err(ApplicationError::ExternalService(format!(
                "Router returned {} legs for {expected} stop pairs",
                route.legs.len()
            )));
        }

        let legs = stops
            .windows(2)
            .zip(&route.legs)
            .map(|(pair, leg)| Self::convert_leg(pair[0].clone(), pair[1].clone(), leg))
            .collect();

        Ok(legs)
    }

    async fn is_available(&self) -> bool {
        self.routing.is_healthy().await
    }
}

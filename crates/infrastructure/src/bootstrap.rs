//! Wiring of concrete clients into the planner

use std::sync::Arc;

use application::{ApplicationError, TripPlannerService};
use integration_charging::OpenChargeMapClient;
use integration_routing::{NominatimGeocodingClient, OsrmRoutingClient};
use tracing::info;

use crate::{
    adapters::{RoutingAdapter, StationDirectoryAdapter},
    config::AppConfig,
};

/// Build a planner backed by OSRM, Nominatim and Open Charge Map
pub fn build_planner(config: &AppConfig) -> Result<TripPlannerService, ApplicationError> {
    let routing = OsrmRoutingClient::new(&config.routing)
        .map_err(|e| ApplicationError::Configuration(format!("routing client: {e}")))?;
    let geocoder = NominatimGeocodingClient::new(&config.geocoding)
        .map_err(|e| ApplicationError::Configuration(format!("geocoding client: {e}")))?;
    let stations = OpenChargeMapClient::new(&config.stations)
        .map_err(|e| ApplicationError::Configuration(format!("station client: {e}")))?;

    let route_port = Arc::new(RoutingAdapter::new(Arc::new(routing), Arc::new(geocoder)));
    let station_port = Arc::new(
        StationDirectoryAdapter::new(Arc::new(stations))
            .with_circuit_breaker_config(config.circuit_breaker.clone()),
    );

    info!(
        routing = %config.routing.base_url,
        stations = %config.stations.base_url,
        "Planner ready"
    );

    Ok(TripPlannerService::new(
        route_port,
        station_port,
        config.planner.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let planner = build_planner(&AppConfig::default()).unwrap();
        assert!((planner.config().search_radius_miles - 25.0).abs() < f64::EPSILON);
    }
}

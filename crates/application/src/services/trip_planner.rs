//! Trip planning service
//!
//! Orchestrates a planning run: fetch the route geometry, build the station
//! pool along it, then simulate the drive.

use std::fmt;
use std::sync::Arc;

use domain::{
    ChargingNetwork, ChargingStation, DEFAULT_EFFICIENCY_FACTOR, DEFAULT_MAX_BATTERY,
    DEFAULT_MIN_BATTERY, DEFAULT_SAFETY_BUFFER, DomainError, GeoLocation, Location, RoutePlan,
    VehicleProfile,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::drive_simulator::DriveSimulator;
use super::station_aggregator::{RouteStationAggregator, route_sample_points};
use crate::error::ApplicationError;
use crate::ports::{RouteGeometryPort, StationDirectoryPort};

/// Planner tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Station search radius around each sample point (default: 25)
    #[serde(default = "default_search_radius")]
    pub search_radius_miles: f64,

    /// Ignore chargers below this power; `None` disables the filter (default: 50)
    #[serde(default = "default_min_power")]
    pub min_power_kw: Option<f64>,

    /// Percentage kept above the minimum before a stop is triggered (default: 5)
    #[serde(default = "default_safety_buffer")]
    pub safety_buffer: f64,

    /// Consumption multiplier over the rated range (default: 1.1)
    #[serde(default = "default_efficiency_factor")]
    pub efficiency_factor: f64,

    /// Minimum battery when the request does not set one (default: 20)
    #[serde(default = "default_min_battery")]
    pub default_min_battery: f64,

    /// Charge target when the request does not set one (default: 80)
    #[serde(default = "default_max_battery")]
    pub default_max_battery: f64,
}

const fn default_search_radius() -> f64 {
    25.0
}

#[allow(clippy::unnecessary_wraps)]
const fn default_min_power() -> Option<f64> {
    Some(50.0)
}

const fn default_safety_buffer() -> f64 {
    DEFAULT_SAFETY_BUFFER
}

const fn default_efficiency_factor() -> f64 {
    DEFAULT_EFFICIENCY_FACTOR
}

const fn default_min_battery() -> f64 {
    DEFAULT_MIN_BATTERY
}

const fn default_max_battery() -> f64 {
    DEFAULT_MAX_BATTERY
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            search_radius_miles: default_search_radius(),
            min_power_kw: default_min_power(),
            safety_buffer: default_safety_buffer(),
            efficiency_factor: default_efficiency_factor(),
            default_min_battery: default_min_battery(),
            default_max_battery: default_max_battery(),
        }
    }
}

impl PlannerConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !self.search_radius_miles.is_finite() || self.search_radius_miles <= 0.0 {
            return Err("search_radius_miles must be positive".to_string());
        }
        if self.min_power_kw.is_some_and(|kw| !kw.is_finite() || kw < 0.0) {
            return Err("min_power_kw must not be negative".to_string());
        }
        if !self.efficiency_factor.is_finite() || self.efficiency_factor <= 0.0 {
            return Err("efficiency_factor must be positive".to_string());
        }
        VehicleProfile::with_range(1.0)
            .with_bounds(self.default_min_battery, self.default_max_battery)
            .with_tuning(self.safety_buffer, self.efficiency_factor)
            .validate()
            .map_err(|e| e.to_string())
    }
}

/// Input of a planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Where the trip starts
    pub origin: Location,
    /// Where the trip ends
    pub destination: Location,
    /// Intermediate stops, in order
    #[serde(default)]
    pub waypoints: Vec<Location>,
    /// Rated vehicle range in miles
    pub vehicle_range_miles: f64,
    /// Battery percentage at departure
    pub current_battery: f64,
    /// Overrides the configured minimum battery
    #[serde(default)]
    pub min_battery: Option<f64>,
    /// Overrides the configured charge target
    #[serde(default)]
    pub max_battery: Option<f64>,
    /// Only charge on these networks
    #[serde(default)]
    pub preferred_networks: Option<Vec<ChargingNetwork>>,
}

impl PlanRequest {
    /// Create a request with configured battery bounds and no network filter
    #[must_use]
    pub const fn new(
        origin: Location,
        destination: Location,
        vehicle_range_miles: f64,
        current_battery: f64,
    ) -> Self {
        Self {
            origin,
            destination,
            waypoints: Vec::new(),
            vehicle_range_miles,
            current_battery,
            min_battery: None,
            max_battery: None,
            preferred_networks: None,
        }
    }

    /// Add intermediate waypoints
    #[must_use]
    pub fn with_waypoints(mut self, waypoints: Vec<Location>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Override the battery bounds
    #[must_use]
    pub const fn with_bounds(mut self, min_battery: Option<f64>, max_battery: Option<f64>) -> Self {
        self.min_battery = min_battery;
        self.max_battery = max_battery;
        self
    }

    /// Restrict charging to the given networks; an empty list means any
    #[must_use]
    pub fn with_networks(mut self, networks: Vec<ChargingNetwork>) -> Self {
        self.preferred_networks = Some(networks).filter(|n| !n.is_empty());
        self
    }

    /// The vehicle profile this request describes under `config`
    #[must_use]
    pub fn vehicle_profile(&self, config: &PlannerConfig) -> VehicleProfile {
        VehicleProfile::with_range(self.vehicle_range_miles)
            .with_bounds(
                self.min_battery.unwrap_or(config.default_min_battery),
                self.max_battery.unwrap_or(config.default_max_battery),
            )
            .with_tuning(config.safety_buffer, config.efficiency_factor)
    }

    /// Validate the request and resolve its vehicle profile
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a non-positive range, a
    /// current battery outside [0, 100] or invalid battery bounds.
    pub fn validate(&self, config: &PlannerConfig) -> Result<VehicleProfile, DomainError> {
        if !(0.0..=100.0).contains(&self.current_battery) {
            return Err(DomainError::ValidationError(format!(
                "current battery must be within 0-100, got {}",
                self.current_battery
            )));
        }
        let vehicle = self.vehicle_profile(config);
        vehicle.validate()?;
        Ok(vehicle)
    }
}

/// Provider reachability reported by [`TripPlannerService::status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    /// Routing provider answered its health check
    pub routing: bool,
    /// Station directory answered and its circuit is not open
    pub stations: bool,
}

impl ServiceStatus {
    /// Planning needs the routing provider; stations only degrade
    #[must_use]
    pub const fn can_plan(&self) -> bool {
        self.routing
    }
}

/// Plans charging stops for a trip
pub struct TripPlannerService {
    routing: Arc<dyn RouteGeometryPort>,
    aggregator: RouteStationAggregator,
    config: PlannerConfig,
}

impl fmt::Debug for TripPlannerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPlannerService")
            .field("routing", &"dyn RouteGeometryPort")
            .field("aggregator", &self.aggregator)
            .field("config", &self.config)
            .finish()
    }
}

impl TripPlannerService {
    /// Create a planner over a routing provider and a station directory
    #[must_use]
    pub fn new(
        routing: Arc<dyn RouteGeometryPort>,
        stations: Arc<dyn StationDirectoryPort>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            routing,
            aggregator: RouteStationAggregator::new(stations),
            config,
        }
    }

    /// Planner configuration in use
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip.
    ///
    /// Station lookups that fail only shrink the candidate pool. When a stop
    /// is required but no station is reachable the plan is still returned;
    /// use [`RoutePlan::legs_below`] to find legs that end under the safety
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, or if the routing provider
    /// fails or returns no legs.
    #[instrument(skip(self, request), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn plan_route(&self, request: &PlanRequest) -> Result<RoutePlan, ApplicationError> {
        let vehicle = request.validate(&self.config)?;

        let legs = self
            .routing
            .route(&request.origin, &request.destination, &request.waypoints)
            .await?;
        if legs.is_empty() {
            return Err(ApplicationError::RouteNotFound {
                from: request.origin.to_string(),
                to: request.destination.to_string(),
            });
        }

        let sample_points = route_sample_points(&legs);
        let stations = self
            .aggregator
            .aggregate(
                &sample_points,
                self.config.search_radius_miles,
                self.config.min_power_kw,
                request.preferred_networks.as_deref(),
            )
            .await;

        let outcome = DriveSimulator::new(vehicle).run(&legs, &stations, request.current_battery);
        let plan = RoutePlan::new(outcome.legs, outcome.charging_stops, stations);

        let short_legs = plan.legs_below(vehicle.safety_threshold()).len();
        if short_legs > 0 {
            warn!(
                short_legs,
                threshold = vehicle.safety_threshold(),
                "Plan drops below the safety threshold"
            );
        }

        info!(
            distance_miles = plan.total_distance_miles,
            stops = plan.charging_stops.len(),
            stations = plan.available_stations.len(),
            "Planned route"
        );
        Ok(plan)
    }

    /// Stations around a single point, filtered and sorted like a route pool
    #[instrument(skip(self, networks))]
    pub async fn stations_near(
        &self,
        center: GeoLocation,
        radius_miles: Option<f64>,
        min_power_kw: Option<f64>,
        networks: Option<&[ChargingNetwork]>,
    ) -> Vec<ChargingStation> {
        self.aggregator
            .aggregate(
                &[center],
                radius_miles.unwrap_or(self.config.search_radius_miles),
                min_power_kw,
                networks,
            )
            .await
    }

    /// Reachability of the routing provider and the station directory
    pub async fn status(&self) -> ServiceStatus {
        let (routing, stations) = futures::join!(
            self.routing.is_available(),
            self.aggregator.is_directory_available()
        );
        ServiceStatus { routing, stations }
    }
}

#[cfg(test)]
mod tests {
    use domain::{LegKind, METERS_PER_MILE, RouteLeg};

    use super::*;
    use crate::ports::{MockRouteGeometryPort, MockStationDirectoryPort};

    fn place(name: &str, lat: f64, lon: f64) -> Location {
        Location::new(name, "").with_coords(lat, lon)
    }

    fn origin() -> Location {
        place("Bakersfield", 35.37, -119.02)
    }

    fn midpoint() -> Location {
        place("Kettleman City", 36.0, -119.96)
    }

    fn destination() -> Location {
        place("Los Banos", 37.06, -120.85)
    }

    /// Two 70 mile legs of 65 minutes each
    fn route() -> Vec<RouteLeg> {
        vec![
            RouteLeg::new(origin(), midpoint(), 70.0 * METERS_PER_MILE, 65.0 * 60.0),
            RouteLeg::new(midpoint(), destination(), 70.0 * METERS_PER_MILE, 65.0 * 60.0),
        ]
    }

    fn routing_with(legs: Vec<RouteLeg>) -> Arc<MockRouteGeometryPort> {
        let mut routing = MockRouteGeometryPort::new();
        routing
            .expect_route()
            .times(1)
            .returning(move |_, _, _| Ok(legs.clone()));
        Arc::new(routing)
    }

    fn midpoint_station() -> ChargingStation {
        ChargingStation::new(
            "ocm-1",
            "Kettleman Supercharger",
            midpoint(),
            ChargingNetwork::Tesla,
            150.0,
        )
        .with_distance(0.2)
    }

    fn directory_with_midpoint_station() -> Arc<MockStationDirectoryPort> {
        let mut directory = MockStationDirectoryPort::new();
        directory
            .expect_search_stations()
            .returning(|_| Ok(vec![midpoint_station()]));
        Arc::new(directory)
    }

    fn request(battery: f64) -> PlanRequest {
        PlanRequest::new(origin(), destination(), 300.0, battery)
            .with_bounds(Some(20.0), Some(80.0))
    }

    #[test]
    fn planner_config_defaults() {
        let config = PlannerConfig::default();
        assert!((config.search_radius_miles - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.min_power_kw, Some(50.0));
        assert!((config.safety_buffer - 5.0).abs() < f64::EPSILON);
        assert!((config.efficiency_factor - 1.1).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn planner_config_deserialize_partial() {
        let config: PlannerConfig = serde_json::from_str(r#"{"search_radius_miles": 10}"#).unwrap();
        assert!((config.search_radius_miles - 10.0).abs() < f64::EPSILON);
        assert!((config.default_max_battery - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn planner_config_rejects_bad_values() {
        let config = PlannerConfig {
            search_radius_miles: 0.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PlannerConfig {
            default_min_battery: 90.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn request_uses_config_bounds_when_unset() {
        let config = PlannerConfig::default();
        let vehicle = PlanRequest::new(origin(), destination(), 250.0, 60.0).vehicle_profile(&config);
        assert!((vehicle.min_battery - 20.0).abs() < f64::EPSILON);
        assert!((vehicle.max_battery - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn request_validation() {
        let config = PlannerConfig::default();
        assert!(request(50.0).validate(&config).is_ok());
        assert!(request(120.0).validate(&config).is_err());
        assert!(
            PlanRequest::new(origin(), destination(), 0.0, 50.0)
                .validate(&config)
                .is_err()
        );
        assert!(
            request(50.0)
                .with_bounds(Some(80.0), Some(20.0))
                .validate(&config)
                .is_err()
        );
    }

    #[test]
    fn request_empty_networks_means_any() {
        assert!(request(50.0).with_networks(vec![]).preferred_networks.is_none());
    }

    #[tokio::test]
    async fn plan_with_sufficient_battery_has_no_stops() {
        let planner = TripPlannerService::new(
            routing_with(route()),
            directory_with_midpoint_station(),
            PlannerConfig::default(),
        );

        let plan = planner.plan_route(&request(90.0)).await.unwrap();

        assert!(plan.charging_stops.is_empty());
        assert_eq!(plan.legs.len(), 2);
        assert!((plan.total_distance_miles - 140.0).abs() < 1e-6);
        assert!((plan.total_duration_minutes - 130.0).abs() < 1e-6);
        assert_eq!(plan.available_stations.len(), 1);
    }

    #[tokio::test]
    async fn plan_with_low_battery_adds_one_stop() {
        let planner = TripPlannerService::new(
            routing_with(route()),
            directory_with_midpoint_station(),
            PlannerConfig::default(),
        );

        let plan = planner.plan_route(&request(30.0)).await.unwrap();

        assert_eq!(plan.charging_stops.len(), 1);
        let stop = &plan.charging_stops[0];
        assert!((stop.departure_battery - 80.0).abs() < f64::EPSILON);
        assert_eq!(stop.charge_time_minutes, 20);
        assert_eq!(plan.legs[0].kind, LegKind::Charging);
        assert!((plan.charging_duration_minutes - 20.0).abs() < f64::EPSILON);
        assert!((plan.total_duration_minutes - 150.0).abs() < 1e-6);
        assert!(plan.legs_below(25.0).is_empty());
    }

    /// 200 mile range over two 75 mile legs: each leg costs 41.25%
    fn two_stretch_planner() -> TripPlannerService {
        let legs = vec![
            RouteLeg::new(origin(), midpoint(), 75.0 * METERS_PER_MILE, 70.0 * 60.0),
            RouteLeg::new(midpoint(), destination(), 75.0 * METERS_PER_MILE, 70.0 * 60.0),
        ];
        let origin_station = ChargingStation::new(
            "ocm-0",
            "Bakersfield EVgo",
            origin(),
            ChargingNetwork::EVgo,
            150.0,
        )
        .with_distance(0.1);

        let mut directory = MockStationDirectoryPort::new();
        directory
            .expect_search_stations()
            .returning(move |_| Ok(vec![origin_station.clone(), midpoint_station()]));
        TripPlannerService::new(routing_with(legs), Arc::new(directory), PlannerConfig::default())
    }

    fn two_stretch_request(battery: f64) -> PlanRequest {
        PlanRequest::new(origin(), destination(), 200.0, battery)
            .with_bounds(Some(20.0), Some(80.0))
    }

    #[tokio::test]
    async fn high_start_charges_once_before_second_stretch() {
        let plan = two_stretch_planner()
            .plan_route(&two_stretch_request(90.0))
            .await
            .unwrap();

        // 90 - 41.25 = 48.75 clears the 25% threshold, 48.75 - 41.25 does not
        assert_eq!(plan.charging_stops.len(), 1);
        let stop = &plan.charging_stops[0];
        assert_eq!(stop.station.id, "ocm-1");
        assert!((stop.arrival_battery - 49.0).abs() < f64::EPSILON);
        // 31.25% of 75 kWh at 150 kW = 9.4 min, rounded up, + 5
        assert_eq!(stop.charge_time_minutes, 15);

        let kinds: Vec<LegKind> = plan.legs.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LegKind::Driving, LegKind::Charging, LegKind::Driving]
        );
        assert!((plan.legs[0].battery_remaining - 48.75).abs() < 1e-6);
        assert!((plan.final_battery().unwrap() - 38.75).abs() < 1e-6);
    }

    #[tokio::test]
    async fn low_start_charges_before_each_stretch() {
        let plan = two_stretch_planner()
            .plan_route(&two_stretch_request(30.0))
            .await
            .unwrap();

        let ids: Vec<&str> = plan
            .charging_stops
            .iter()
            .map(|stop| stop.station.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ocm-0", "ocm-1"]);
        let minutes: Vec<u32> = plan
            .charging_stops
            .iter()
            .map(|stop| stop.charge_time_minutes)
            .collect();
        // 50% then 41.25% of 75 kWh at 150 kW
        assert_eq!(minutes, vec![20, 18]);
        assert_eq!(plan.legs.len(), 4);
        assert!((plan.final_battery().unwrap() - 38.75).abs() < 1e-6);
    }

    #[tokio::test]
    async fn invalid_request_fails_before_routing() {
        let mut routing = MockRouteGeometryPort::new();
        routing.expect_route().never();
        let planner = TripPlannerService::new(
            Arc::new(routing),
            Arc::new(MockStationDirectoryPort::new()),
            PlannerConfig::default(),
        );

        let err = planner.plan_route(&request(-5.0)).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn routing_failure_is_fatal() {
        let mut routing = MockRouteGeometryPort::new();
        routing
            .expect_route()
            .returning(|_, _, _| Err(ApplicationError::ExternalService("OSRM down".to_string())));
        let mut directory = MockStationDirectoryPort::new();
        directory.expect_search_stations().never();
        let planner =
            TripPlannerService::new(Arc::new(routing), Arc::new(directory), PlannerConfig::default());

        let err = planner.plan_route(&request(50.0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }

    #[tokio::test]
    async fn empty_route_is_route_not_found() {
        let planner = TripPlannerService::new(
            routing_with(Vec::new()),
            Arc::new(MockStationDirectoryPort::new()),
            PlannerConfig::default(),
        );

        let err = planner.plan_route(&request(50.0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::RouteNotFound { .. }));
    }

    #[tokio::test]
    async fn station_outage_degrades_to_unplanned_legs() {
        let mut directory = MockStationDirectoryPort::new();
        directory
            .expect_search_stations()
            .returning(|_| Err(ApplicationError::ExternalService("503".to_string())));
        let planner = TripPlannerService::new(
            routing_with(route()),
            Arc::new(directory),
            PlannerConfig::default(),
        );

        let plan = planner.plan_route(&request(30.0)).await.unwrap();

        assert!(plan.charging_stops.is_empty());
        assert!(plan.available_stations.is_empty());
        assert_eq!(plan.legs_below(25.0).len(), 2);
    }

    #[tokio::test]
    async fn preferred_networks_reach_the_directory() {
        let mut directory = MockStationDirectoryPort::new();
        directory
            .expect_search_stations()
            .withf(|query| query.networks == Some(vec![ChargingNetwork::EVgo]))
            .returning(|_| Ok(Vec::new()));
        let planner = TripPlannerService::new(
            routing_with(route()),
            Arc::new(directory),
            PlannerConfig::default(),
        );

        let req = request(90.0).with_networks(vec![ChargingNetwork::EVgo]);
        assert!(planner.plan_route(&req).await.is_ok());
    }

    #[tokio::test]
    async fn stations_near_uses_configured_radius() {
        let mut directory = MockStationDirectoryPort::new();
        directory
            .expect_search_stations()
            .withf(|query| (query.radius_miles - 25.0).abs() < f64::EPSILON)
            .times(1)
            .returning(|_| Ok(vec![midpoint_station()]));
        let planner = TripPlannerService::new(
            Arc::new(MockRouteGeometryPort::new()),
            Arc::new(directory),
            PlannerConfig::default(),
        );

        let center = midpoint().coordinates().unwrap();
        let stations = planner.stations_near(center, None, None, None).await;
        assert_eq!(stations.len(), 1);
    }

    #[tokio::test]
    async fn status_reports_each_provider() {
        let mut routing = MockRouteGeometryPort::new();
        routing.expect_is_available().times(1).returning(|| true);
        let mut directory = MockStationDirectoryPort::new();
        directory.expect_is_available().times(1).returning(|| false);
        let planner =
            TripPlannerService::new(Arc::new(routing), Arc::new(directory), PlannerConfig::default());

        let status = planner.status().await;

        assert_eq!(
            status,
            ServiceStatus {
                routing: true,
                stations: false,
            }
        );
        assert!(status.can_plan());
    }

    #[tokio::test]
    async fn status_without_routing_cannot_plan() {
        let mut routing = MockRouteGeometryPort::new();
        routing.expect_is_available().returning(|| false);
        let mut directory = MockStationDirectoryPort::new();
        directory.expect_is_available().returning(|| true);
        let planner =
            TripPlannerService::new(Arc::new(routing), Arc::new(directory), PlannerConfig::default());

        assert!(!planner.status().await.can_plan());
    }

    #[test]
    fn planner_debug() {
        let planner = TripPlannerService::new(
            Arc::new(MockRouteGeometryPort::new()),
            Arc::new(MockStationDirectoryPort::new()),
            PlannerConfig::default(),
        );
        assert!(format!("{planner:?}").contains("TripPlannerService"));
    }
}

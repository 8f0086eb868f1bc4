//! OSRM route client
//!
//! Fetches driving routes with turn-by-turn steps from an
//! [OSRM](https://project-osrm.org/docs/v5.24.0/api/#route-service) server.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::RoutingError;
use crate::models::{Route, RouteResponse, Step, Waypoint, WaypointLeg};

/// Trait for road routing clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Route through `points` in order; needs at least two points
    async fn route(&self, points: &[GeoLocation]) -> Result<RouteResponse, RoutingError>;

    /// Check if the routing service is reachable
    async fn is_healthy(&self) -> bool;
}

/// OSRM route service client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("evroute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the `/route` URL; OSRM takes `lon,lat` pairs separated by `;`
    fn route_url(&self, points: &[GeoLocation]) -> Result<Url, RoutingError> {
        let coordinates = points
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.longitude(), p.latitude()))
            .collect::<Vec<_>>()
            .join(";");

        let base = format!(
            "{}/route/v1/{}/{coordinates}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        );
        Url::parse(&base)
            .map_err(|e| RoutingError::InvalidRequest(format!("failed to build OSRM URL: {e}")))
    }

    /// Parse a successful OSRM route response into typed models
    fn parse_route_response(body: &str) -> Result<RouteResponse, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            return Err(RoutingError::from_api_code(&raw.code, raw.message));
        }

        let routes = raw
            .routes
            .into_iter()
            .map(Self::convert_route)
            .collect::<Result<Vec<_>, _>>()?;
        if routes.is_empty() {
            return Err(RoutingError::NoRoute("response contained no routes".to_string()));
        }

        let waypoints = raw
            .waypoints
            .into_iter()
            .map(|w| {
                Ok(Waypoint {
                    name: w.name,
                    location: lon_lat(w.location)?,
                    snap_distance_meters: w.distance,
                })
            })
            .collect::<Result<Vec<_>, RoutingError>>()?;

        Ok(RouteResponse { routes, waypoints })
    }

    /// Map an error response body to an error, falling back to the status
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> RoutingError {
        match serde_json::from_str::<RawErrorResponse>(body) {
            Ok(raw) => RoutingError::from_api_code(&raw.code, raw.message),
            Err(_) => RoutingError::RequestFailed(format!("HTTP {status}")),
        }
    }

    fn convert_route(raw: RawRoute) -> Result<Route, RoutingError> {
        let legs = raw
            .legs
            .into_iter()
            .map(Self::convert_leg)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Route {
            distance_meters: raw.distance,
            duration_seconds: raw.duration,
            legs,
        })
    }

    fn convert_leg(raw: RawLeg) -> Result<WaypointLeg, RoutingError> {
        let steps = raw
            .steps
            .into_iter()
            .map(Self::convert_step)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WaypointLeg {
            distance_meters: raw.distance,
            duration_seconds: raw.duration,
            summary: raw.summary,
            steps,
        })
    }

    /// Step endpoints come from the GeoJSON line, or the maneuver point when
    /// the geometry is missing
    fn convert_step(raw: RawStep) -> Result<Step, RoutingError> {
        let maneuver_point = lon_lat(raw.maneuver.location)?;
        let coordinates = raw.geometry.map(|g| g.coordinates).unwrap_or_default();

        let start = coordinates
            .first()
            .map(|c| lon_lat(*c))
            .transpose()?
            .unwrap_or(maneuver_point);
        let end = coordinates
            .last()
            .map(|c| lon_lat(*c))
            .transpose()?
            .unwrap_or(maneuver_point);

        Ok(Step {
            start,
            end,
            distance_meters: raw.distance,
            duration_seconds: raw.duration,
            road_name: raw.name,
            maneuver: raw.maneuver.kind,
        })
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self, points), fields(points = points.len()))]
    async fn route(&self, points: &[GeoLocation]) -> Result<RouteResponse, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::InvalidRequest(
                "a route needs at least two points".to_string(),
            ));
        }

        let url = self.route_url(points)?;
        let params = [
            ("steps", "true"),
            ("geometries", "geojson"),
            ("overview", "false"),
        ];

        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if !status.is_success() {
            let err = Self::parse_error_response(status, &body);
            warn!(%status, error = %err, "Route request rejected");
            return Err(err);
        }

        let result = Self::parse_route_response(&body)?;
        debug!(
            routes = result.routes.len(),
            legs = result.best().map_or(0, |r| r.legs.len()),
            "Route found"
        );
        Ok(result)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!(
            "{}/nearest/v1/{}/0,0",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        );
        self.client.get(&url).send().await.is_ok()
    }
}

/// OSRM coordinates are `[longitude, latitude]`
fn lon_lat(coordinate: [f64; 2]) -> Result<GeoLocation, RoutingError> {
    GeoLocation::new(coordinate[1], coordinate[0]).map_err(|e| {
        RoutingError::ParseError(format!(
            "{e}: [{}, {}]",
            coordinate[0], coordinate[1]
        ))
    })
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
    #[serde(default)]
    waypoints: Vec<RawWaypoint>,
}

#[derive(Debug, Deserialize)]
struct RawErrorResponse {
    code: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    geometry: Option<RawGeometry>,
    maneuver: RawManeuver,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawManeuver {
    location: [f64; 2],
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawWaypoint {
    #[serde(default)]
    name: String,
    location: [f64; 2],
    distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_JSON: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 241402.0,
            "duration": 8280.0,
            "legs": [{
                "distance": 241402.0,
                "duration": 8280.0,
                "summary": "I 5",
                "steps": [
                    {
                        "distance": 1200.5,
                        "duration": 95.1,
                        "name": "Truxtun Avenue",
                        "geometry": {
                            "type": "LineString",
                            "coordinates": [[-119.0187, 35.3733], [-119.0301, 35.3801]]
                        },
                        "maneuver": { "location": [-119.0187, 35.3733], "type": "depart" }
                    },
                    {
                        "distance": 0.0,
                        "duration": 0.0,
                        "name": "",
                        "maneuver": { "location": [-120.8499, 37.0583], "type": "arrive" }
                    }
                ]
            }]
        }],
        "waypoints": [
            { "name": "Truxtun Avenue", "location": [-119.0187, 35.3733], "distance": 3.2 },
            { "name": "", "location": [-120.8499, 37.0583] }
        ]
    }"#;

    #[test]
    fn test_parse_route_response() {
        let response = OsrmRoutingClient::parse_route_response(ROUTE_JSON).unwrap();
        let route = response.best().unwrap();

        assert!((route.distance_meters - 241_402.0).abs() < f64::EPSILON);
        assert_eq!(route.legs.len(), 1);
        assert_eq!(route.legs[0].summary, "I 5");
        assert_eq!(route.legs[0].steps.len(), 2);
        assert_eq!(response.waypoints.len(), 2);
        assert_eq!(response.waypoints[0].snap_distance_meters, Some(3.2));
    }

    #[test]
    fn test_step_endpoints_from_geometry() {
        let response = OsrmRoutingClient::parse_route_response(ROUTE_JSON).unwrap();
        let step = &response.routes[0].legs[0].steps[0];

        assert!((step.start.latitude() - 35.3733).abs() < 1e-9);
        assert!((step.end.longitude() - -119.0301).abs() < 1e-9);
        assert_eq!(step.maneuver, "depart");
        assert_eq!(step.road_name, "Truxtun Avenue");
    }

    #[test]
    fn test_step_without_geometry_uses_maneuver() {
        let response = OsrmRoutingClient::parse_route_response(ROUTE_JSON).unwrap();
        let step = &response.routes[0].legs[0].steps[1];

        assert_eq!(step.start, step.end);
        assert!((step.start.latitude() - 37.0583).abs() < 1e-9);
    }

    #[test]
    fn test_parse_no_route_code() {
        let json = r#"{ "code": "NoRoute", "message": "Impossible route between points" }"#;
        let err = OsrmRoutingClient::parse_route_response(json).unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute(_)));
    }

    #[test]
    fn test_parse_ok_without_routes() {
        let json = r#"{ "code": "Ok", "routes": [], "waypoints": [] }"#;
        let err = OsrmRoutingClient::parse_route_response(json).unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute(_)));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = OsrmRoutingClient::parse_route_response("not json");
        assert!(matches!(result, Err(RoutingError::ParseError(_))));
    }

    #[test]
    fn test_parse_out_of_range_coordinate() {
        let json = r#"{
            "code": "Ok",
            "routes": [{ "distance": 1.0, "duration": 1.0, "legs": [] }],
            "waypoints": [{ "location": [200.0, 95.0] }]
        }"#;
        let result = OsrmRoutingClient::parse_route_response(json);
        assert!(matches!(result, Err(RoutingError::ParseError(_))));
    }

    #[test]
    fn test_parse_error_response_without_json() {
        let err = OsrmRoutingClient::parse_error_response(
            reqwest::StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        );
        assert!(matches!(err, RoutingError::RequestFailed(msg) if msg.contains("502")));
    }

    #[test]
    fn test_route_url() {
        let config = OsrmConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..OsrmConfig::default()
        };
        let client = OsrmRoutingClient::new(&config).unwrap();
        let url = client
            .route_url(&[GeoLocation::los_angeles(), GeoLocation::san_francisco()])
            .unwrap();

        assert!(url.as_str().starts_with("http://localhost:5000/route/v1/driving/-118."));
        assert_eq!(url.path().matches(';').count(), 1);
    }
}

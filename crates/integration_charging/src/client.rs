//! Open Charge Map client
//!
//! Searches the `/poi` endpoint and maps points of interest onto
//! [`ChargingStation`]s.

use std::time::Duration;

use async_trait::async_trait;
use domain::geodesy::distance;
use domain::{ChargingNetwork, ChargingStation, Location};
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::OpenChargeMapConfig;
use crate::error::StationError;
use crate::models::StationSearch;

/// Open Charge Map `DistanceUnit` for kilometers
const DISTANCE_UNIT_KM: u8 = 1;

const MILES_PER_KM: f64 = 0.621_371;

/// Trait for charging station directories
#[async_trait]
pub trait StationDirectoryClient: Send + Sync {
    /// Stations within the search radius passing the search filters
    async fn search(&self, search: &StationSearch) -> Result<Vec<ChargingStation>, StationError>;

    /// Check if the directory is reachable
    async fn is_healthy(&self) -> bool;
}

/// Open Charge Map client with a short-lived result cache
#[derive(Debug)]
pub struct OpenChargeMapClient {
    client: Client,
    config: OpenChargeMapConfig,
    cache: Option<Cache<String, Vec<ChargingStation>>>,
}

impl OpenChargeMapClient {
    /// Create a new Open Charge Map client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OpenChargeMapConfig) -> Result<Self, StationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("evroute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StationError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
        })
    }

    fn query_params(&self, search: &StationSearch) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("output", "json".to_string()),
            ("latitude", search.center.latitude().to_string()),
            ("longitude", search.center.longitude().to_string()),
            ("distance", search.radius_miles.to_string()),
            ("distanceunit", "Miles".to_string()),
            ("maxresults", self.config.max_results.to_string()),
            ("compact", "false".to_string()),
            ("verbose", "false".to_string()),
        ];
        if let Some(min_power) = search.min_power_kw {
            params.push(("minpowerkw", min_power.to_string()));
        }
        params
    }

    /// Parse the raw `/poi` response into stations
    fn parse_poi_response(body: &str) -> Result<Vec<ChargingStation>, StationError> {
        let raw: Vec<RawPoi> =
            serde_json::from_str(body).map_err(|e| StationError::ParseError(e.to_string()))?;

        Ok(raw.into_iter().map(Self::convert_poi).collect())
    }

    fn convert_poi(raw: RawPoi) -> ChargingStation {
        let address = raw.address_info;
        let id = raw.id.to_string();
        let name = address
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Station {id}"));

        let street = [
            address.address_line1.as_deref(),
            address.town.as_deref(),
            address.state_or_province.as_deref(),
            address.postcode.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        let location = Location {
            name: name.clone(),
            address: street,
            latitude: address.latitude,
            longitude: address.longitude,
        };

        let network = raw
            .operator_info
            .and_then(|o| o.title)
            .map_or(ChargingNetwork::Other, |title| {
                ChargingNetwork::from_operator(&title)
            });

        let power_kw = raw
            .connections
            .iter()
            .filter_map(|c| c.power_kw)
            .filter(|kw| kw.is_finite())
            .fold(0.0, f64::max);

        let mut connectors: Vec<String> = Vec::new();
        for title in raw
            .connections
            .into_iter()
            .filter_map(|c| c.connection_type.and_then(|t| t.title))
        {
            if !connectors.contains(&title) {
                connectors.push(title);
            }
        }

        let available = raw
            .status_type
            .and_then(|s| s.is_operational)
            .unwrap_or(true);

        let distance_miles = address.distance.map(|d| {
            if address.distance_unit == Some(DISTANCE_UNIT_KM) {
                d * MILES_PER_KM
            } else {
                d
            }
        });

        let mut station = ChargingStation::new(id, name, location, network, power_kw)
            .with_connectors(connectors);
        station.available = available;
        station.distance_miles = distance_miles;
        station
    }

    /// Keep stations inside the radius that pass the search filters, filling
    /// in missing distances from the coordinates
    fn apply_filters(search: &StationSearch, stations: Vec<ChargingStation>) -> Vec<ChargingStation> {
        stations
            .into_iter()
            .filter_map(|mut station| {
                if let Some(coords) = station.coordinates() {
                    let d = distance(&search.center, &coords);
                    if d > search.radius_miles {
                        return None;
                    }
                    if station.distance_miles.is_none() {
                        station.distance_miles = Some(d);
                    }
                }
                Some(station)
            })
            .filter(|station| search.matches(station))
            .collect()
    }

    async fn fetch(&self, search: &StationSearch) -> Result<Vec<ChargingStation>, StationError> {
        let url = format!("{}/poi", self.config.base_url.trim_end_matches('/'));
        let mut request = self
            .client
            .get(&url)
            .query(&self.query_params(search))
            .header("Accept", "application/json");
        if let Some(ref key) = self.config.api_key {
            request = request.header("X-API-Key", key);
        }

        debug!(?url, "Searching charging stations");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                StationError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                StationError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StationError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StationError::Unauthorized(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(StationError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StationError::ParseError(e.to_string()))?;

        Self::parse_poi_response(&body)
    }
}

#[async_trait]
impl StationDirectoryClient for OpenChargeMapClient {
    #[instrument(skip(self, search), fields(center = %search.center, radius = search.radius_miles))]
    async fn search(&self, search: &StationSearch) -> Result<Vec<ChargingStation>, StationError> {
        if !search.radius_miles.is_finite() || search.radius_miles <= 0.0 {
            return Err(StationError::InvalidSearch(format!(
                "radius must be positive, got {}",
                search.radius_miles
            )));
        }

        let cache_key = search.cache_key();
        if let Some(ref cache) = self.cache {
            if let Some(stations) = cache.get(&cache_key).await {
                debug!(count = stations.len(), "Station cache hit");
                return Ok(stations);
            }
        }

        let fetched = self.fetch(search).await?;
        let fetched_count = fetched.len();
        let stations = Self::apply_filters(search, fetched);

        if stations.is_empty() {
            warn!(fetched = fetched_count, "No stations matched search");
        }
        debug!(
            fetched = fetched_count,
            kept = stations.len(),
            "Stations found"
        );

        if let Some(ref cache) = self.cache {
            cache.insert(cache_key, stations.clone()).await;
        }
        Ok(stations)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!(
            "{}/poi?output=json&maxresults=1&compact=true&verbose=false",
            self.config.base_url.trim_end_matches('/')
        );
        let mut request = self.client.get(&url);
        if let Some(ref key) = self.config.api_key {
            request = request.header("X-API-Key", key);
        }
        request
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPoi {
    #[serde(rename = "ID")]
    id: u64,
    address_info: RawAddressInfo,
    operator_info: Option<RawOperatorInfo>,
    status_type: Option<RawStatusType>,
    #[serde(default)]
    connections: Vec<RawConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAddressInfo {
    title: Option<String>,
    address_line1: Option<String>,
    town: Option<String>,
    state_or_province: Option<String>,
    postcode: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    distance: Option<f64>,
    distance_unit: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawOperatorInfo {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatusType {
    is_operational: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConnection {
    connection_type: Option<RawConnectionType>,
    #[serde(rename = "PowerKW")]
    power_kw: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConnectionType {
    title: Option<String>,
}

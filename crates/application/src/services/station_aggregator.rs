//! Route Station Aggregator
//!
//! Builds the candidate station pool for a whole route by searching around a
//! handful of points sampled along it. A single search around the endpoints
//! would miss chargers near the middle of a long route; sampling approximates
//! a search along the polyline without corridor geometry.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use domain::{ChargingNetwork, ChargingStation, GeoLocation, RouteLeg};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::ports::{StationDirectoryPort, StationQuery};

/// Upper bound on station searches per planning run
pub const MAX_SEARCH_POINTS: usize = 5;

/// Upper bound on step start points taken from the route geometry
pub const MAX_STEP_SAMPLES: usize = 10;

/// Sample points along a route: every leg start, an evenly strided subset of
/// step starts, and the final destination.
///
/// Points without coordinates are skipped.
#[must_use]
pub fn route_sample_points(legs: &[RouteLeg]) -> Vec<GeoLocation> {
    let total_steps: usize = legs.iter().map(|leg| leg.steps.len()).sum();
    let stride = total_steps.div_ceil(MAX_STEP_SAMPLES).max(1);

    let mut points = Vec::new();
    let mut step_index = 0usize;

    for leg in legs {
        if let Some(start) = leg.start.coordinates() {
            points.push(start);
        }
        for step in &leg.steps {
            if step_index % stride == 0 {
                points.push(step.start);
            }
            step_index += 1;
        }
    }

    if let Some(end) = legs.last().and_then(|leg| leg.end.coordinates()) {
        points.push(end);
    }

    points
}

/// At most [`MAX_SEARCH_POINTS`] points taken with stride `max(1, n / 5)`
#[must_use]
pub fn select_search_points(points: &[GeoLocation]) -> Vec<GeoLocation> {
    let stride = (points.len() / MAX_SEARCH_POINTS).max(1);
    points
        .iter()
        .step_by(stride)
        .take(MAX_SEARCH_POINTS)
        .copied()
        .collect()
}

/// Merge search results into one pool.
///
/// Deduplicates by station id (first occurrence wins) and sorts ascending by
/// distance. A station without a distance sorts as if it were at distance 0,
/// so undistanced stations come first.
#[must_use]
pub fn merge_station_batches(
    batches: impl IntoIterator<Item = Vec<ChargingStation>>,
) -> Vec<ChargingStation> {
    let mut seen = HashSet::new();
    let mut pool: Vec<ChargingStation> = batches
        .into_iter()
        .flatten()
        .filter(|station| seen.insert(station.id.clone()))
        .collect();

    // TODO: sort undistanced stations last once callers no longer depend on
    // the current order
    pool.sort_by(|a, b| {
        a.distance_miles
            .unwrap_or(0.0)
            .total_cmp(&b.distance_miles.unwrap_or(0.0))
    });
    pool
}

/// Searches the station directory around sample points of a route
pub struct RouteStationAggregator {
    directory: Arc<dyn StationDirectoryPort>,
}

impl fmt::Debug for RouteStationAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteStationAggregator")
            .field("directory", &"dyn StationDirectoryPort")
            .finish()
    }
}

impl RouteStationAggregator {
    /// Create an aggregator over a station directory
    #[must_use]
    pub fn new(directory: Arc<dyn StationDirectoryPort>) -> Self {
        Self { directory }
    }

    /// Check if the station directory is reachable
    pub async fn is_directory_available(&self) -> bool {
        self.directory.is_available().await
    }

    /// Deduplicated, distance-sorted stations near the route.
    ///
    /// Searches run concurrently, one per selected sample point. A failed
    /// search contributes no stations.
    #[instrument(skip(self, sample_points), fields(sample_points = sample_points.len()))]
    pub async fn aggregate(
        &self,
        sample_points: &[GeoLocation],
        radius_miles: f64,
        min_power_kw: Option<f64>,
        networks: Option<&[ChargingNetwork]>,
    ) -> Vec<ChargingStation> {
        let search_points = select_search_points(sample_points);

        let lookups = search_points.iter().map(|center| {
            let query = StationQuery::new(*center, radius_miles)
                .with_min_power(min_power_kw)
                .with_networks(networks.map(<[ChargingNetwork]>::to_vec));
            self.lookup(query)
        });

        let batches = join_all(lookups).await;
        let pool = merge_station_batches(batches);

        debug!(
            searches = search_points.len(),
            stations = pool.len(),
            "Aggregated route stations"
        );
        pool
    }

    async fn lookup(&self, query: StationQuery) -> Vec<ChargingStation> {
        match self.directory.search_stations(&query).await {
            Ok(stations) => stations,
            Err(e) => {
                warn!(center = %query.center, error = %e, "Station search failed, skipping point");
                Vec::new()
            },
        }
    }
}

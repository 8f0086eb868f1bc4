//! Station directory adapter - Implements StationDirectoryPort using integration_charging

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{StationDirectoryPort, StationQuery},
};
use async_trait::async_trait;
use domain::ChargingStation;
use integration_charging::{StationDirectoryClient, StationError, StationSearch};
use tracing::{debug, instrument, warn};

use super::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError};

const SERVICE_NAME: &str = "station-directory";

/// Adapter for charging station lookups
///
/// Directory outages never fail a plan: errors and an open circuit both
/// come back as an empty station list.
pub struct StationDirectoryAdapter {
    client: Arc<dyn StationDirectoryClient>,
    circuit_breaker: Option<CircuitBreaker>,
}

impl std::fmt::Debug for StationDirectoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationDirectoryAdapter")
            .field("client", &"dyn StationDirectoryClient")
            .field(
                "circuit_breaker",
                &self.circuit_breaker.as_ref().map(CircuitBreaker::name),
            )
            .finish()
    }
}

impl StationDirectoryAdapter {
    /// Create a new adapter without a circuit breaker
    #[must_use]
    pub fn new(client: Arc<dyn StationDirectoryClient>) -> Self {
        Self {
            client,
            circuit_breaker: None,
        }
    }

    /// Enable circuit breaker with default configuration
    #[must_use]
    pub fn with_circuit_breaker(mut self) -> Self {
        self.circuit_breaker = Some(CircuitBreaker::new(SERVICE_NAME));
        self
    }

    /// Enable circuit breaker with custom configuration
    #[must_use]
    pub fn with_circuit_breaker_config(mut self, config: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = Some(CircuitBreaker::with_config(SERVICE_NAME, config));
        self
    }

    /// Translate a port query into the directory's search type
    fn to_search(query: &StationQuery) -> StationSearch {
        let mut search = StationSearch::new(query.center, query.radius_miles)
            .with_networks(query.networks.clone().unwrap_or_default());
        if let Some(min_power) = query.min_power_kw {
            search = search.with_min_power(min_power);
        }
        if !query.operational_only {
            search = search.including_offline();
        }
        search
    }

    async fn fetch(&self, search: &StationSearch) -> Result<Vec<ChargingStation>, String> {
        match self.circuit_breaker {
            Some(ref cb) => cb
                .call(|| self.client.search(search))
                .await
                .map_err(|e| match e {
                    CircuitBreakerError::CircuitOpen(open) => open.to_string(),
                    CircuitBreakerError::ServiceError(err) => Self::describe(&err),
                }),
            None => self
                .client
                .search(search)
                .await
                .map_err(|e| Self::describe(&e)),
        }
    }

    fn describe(err: &StationError) -> String {
        if err.is_retryable() {
            format!("Station directory temporarily unavailable: {err}")
        } else {
            format!("Station directory request failed: {err}")
        }
    }
}

#[async_trait]
impl StationDirectoryPort for StationDirectoryAdapter {
    #[instrument(skip(self, query), fields(lat = query.center.latitude(), lon = query.center.longitude(), radius = query.radius_miles))]
    async fn search_stations(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<ChargingStation>, ApplicationError> {
        let search = Self::to_search(query);

        match self.fetch(&search).await {
            Ok(stations) => {
                debug!(count = stations.len(), "Stations found");
                Ok(stations)
            },
            Err(reason) => {
                warn!(%reason, "Station lookup degraded to empty result");
                Ok(Vec::new())
            },
        }
    }

    async fn is_available(&self) -> bool {
        if self.circuit_breaker.as_ref().is_some_and(CircuitBreaker::is_open) {
            return false;
        }
        self.client.is_healthy().await
    }
}

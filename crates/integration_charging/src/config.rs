//! Open Charge Map configuration

use serde::{Deserialize, Serialize};

/// Upper bound Open Charge Map accepts for `maxresults` without paging
const MAX_RESULTS_LIMIT: u32 = 500;

/// Configuration for the Open Charge Map client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenChargeMapConfig {
    /// Base URL for the Open Charge Map API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `X-API-Key` (optional for low request volumes)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of stations requested per search
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,
}

fn default_base_url() -> String {
    "https://api.openchargemap.io/v3".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_results() -> u32 {
    50
}

const fn default_cache_ttl_minutes() -> u32 {
    10
}

impl Default for OpenChargeMapConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl OpenChargeMapConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            max_results: 10,
            cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }

        if self.max_results > MAX_RESULTS_LIMIT {
            return Err(format!("max_results must be {MAX_RESULTS_LIMIT} or less"));
        }

        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err("api_key must not be blank when set".to_string());
        }

        Ok(())
    }
}

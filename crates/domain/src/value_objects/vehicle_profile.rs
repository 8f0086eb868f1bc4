//! Vehicle energy model

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Default lowest battery percentage the planner is willing to arrive with
pub const DEFAULT_MIN_BATTERY: f64 = 20.0;

/// Default charge target at every stop
pub const DEFAULT_MAX_BATTERY: f64 = 80.0;

/// Extra percentage kept on top of the minimum before a stop is triggered
pub const DEFAULT_SAFETY_BUFFER: f64 = 5.0;

/// Consumption multiplier over the rated range
pub const DEFAULT_EFFICIENCY_FACTOR: f64 = 1.1;

/// Battery parameters of the vehicle being planned for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Rated range on a full battery, in miles
    pub range_miles: f64,
    /// Minimum battery percentage
    pub min_battery: f64,
    /// Target battery percentage when leaving a charger
    pub max_battery: f64,
    /// Percentage added on top of `min_battery` before a stop is required
    pub safety_buffer: f64,
    /// Real-world consumption relative to the rated range
    pub efficiency_factor: f64,
}

impl VehicleProfile {
    /// Create a profile with default bounds for the given range
    #[must_use]
    pub const fn with_range(range_miles: f64) -> Self {
        Self {
            range_miles,
            min_battery: DEFAULT_MIN_BATTERY,
            max_battery: DEFAULT_MAX_BATTERY,
            safety_buffer: DEFAULT_SAFETY_BUFFER,
            efficiency_factor: DEFAULT_EFFICIENCY_FACTOR,
        }
    }

    /// Override the battery bounds
    #[must_use]
    pub const fn with_bounds(mut self, min_battery: f64, max_battery: f64) -> Self {
        self.min_battery = min_battery;
        self.max_battery = max_battery;
        self
    }

    /// Override the safety buffer and efficiency factor
    #[must_use]
    pub const fn with_tuning(mut self, safety_buffer: f64, efficiency_factor: f64) -> Self {
        self.safety_buffer = safety_buffer;
        self.efficiency_factor = efficiency_factor;
        self
    }

    /// Battery percentage consumed by driving `miles`
    #[must_use]
    pub fn battery_needed(&self, miles: f64) -> f64 {
        miles * (100.0 / self.range_miles) * self.efficiency_factor
    }

    /// Level below which the planner must not plan to drop
    #[must_use]
    pub fn safety_threshold(&self) -> f64 {
        self.min_battery + self.safety_buffer
    }

    /// Validate the profile
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the range is not positive,
    /// a bound lies outside [0, 100], or `min_battery >= max_battery`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.range_miles.is_finite() || self.range_miles <= 0.0 {
            return Err(DomainError::ValidationError(format!(
                "vehicle range must be positive, got {}",
                self.range_miles
            )));
        }

        for (name, value) in [
            ("min_battery", self.min_battery),
            ("max_battery", self.max_battery),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(DomainError::ValidationError(format!(
                    "{name} must be within 0-100, got {value}"
                )));
            }
        }

        if self.min_battery >= self.max_battery {
            return Err(DomainError::ValidationError(format!(
                "min_battery ({}) must be below max_battery ({})",
                self.min_battery, self.max_battery
            )));
        }

        if !self.safety_buffer.is_finite() || self.safety_buffer < 0.0 {
            return Err(DomainError::ValidationError(
                "safety_buffer must not be negative".to_string(),
            ));
        }

        if !self.efficiency_factor.is_finite() || self.efficiency_factor <= 0.0 {
            return Err(DomainError::ValidationError(
                "efficiency_factor must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

//! Charge time estimation
//!
//! Uses a fixed average usable pack size rather than the actual vehicle's,
//! and a flat charging rate at the charger's rated power.

/// Assumed usable battery capacity in kWh
pub const AVERAGE_BATTERY_CAPACITY_KWH: f64 = 75.0;

/// Minutes added to every stop for parking, plugging in and payment
pub const SETUP_BUFFER_MINUTES: u32 = 5;

/// Chargers reporting less than this (or no power at all) are treated as this
pub const MIN_CHARGER_POWER_KW: f64 = 1.0;

/// Estimated minutes to add `percent_needed` percent at `charger_power_kw`.
///
/// Rounds up to whole minutes and adds [`SETUP_BUFFER_MINUTES`]. A
/// non-positive or NaN percentage costs only the buffer.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn charge_minutes(percent_needed: f64, charger_power_kw: f64) -> u32 {
    if percent_needed.is_nan() || percent_needed <= 0.0 {
        return SETUP_BUFFER_MINUTES;
    }

    let power = if charger_power_kw.is_nan() {
        MIN_CHARGER_POWER_KW
    } else {
        charger_power_kw.max(MIN_CHARGER_POWER_KW)
    };

    let energy_kwh = percent_needed.min(100.0) * AVERAGE_BATTERY_CAPACITY_KWH / 100.0;
    let hours = energy_kwh / power;
    let minutes = (hours * 60.0).ceil() as u32;

    minutes + SETUP_BUFFER_MINUTES
}

//! Trip itinerary: driving and charging legs plus the stops used

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ChargingStation, Location};

/// What happens on an itinerary leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    /// Driving a route leg
    Driving,
    /// Detouring to and charging at a station
    Charging,
}

impl LegKind {
    /// Emoji representation for terminal output
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Driving => "🚗",
            Self::Charging => "⚡",
        }
    }
}

/// One entry of the planned itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryLeg {
    /// Driving or charging
    pub kind: LegKind,
    /// Where the leg starts
    pub from: Location,
    /// Where the leg ends
    pub to: Location,
    /// Distance in miles (zero for charging legs)
    pub distance_miles: f64,
    /// Duration in minutes
    pub duration_minutes: f64,
    /// Battery percentage consumed (zero for charging legs)
    pub battery_used: f64,
    /// Battery percentage left when the leg ends
    pub battery_remaining: f64,
}

impl ItineraryLeg {
    /// Whether this is a driving leg
    #[must_use]
    pub fn is_driving(&self) -> bool {
        self.kind == LegKind::Driving
    }

    /// Format as a single detail line
    #[must_use]
    pub fn format_detail(&self) -> String {
        let emoji = self.kind.emoji();
        match self.kind {
            LegKind::Driving => format!(
                "{emoji} {} → {} ({:.1} mi, {:.0} min, -{:.0}% → {:.0}%)",
                self.from,
                self.to,
                self.distance_miles,
                self.duration_minutes,
                self.battery_used,
                self.battery_remaining
            ),
            LegKind::Charging => format!(
                "{emoji} Charge at {} ({:.0} min → {:.0}%)",
                self.to, self.duration_minutes, self.battery_remaining
            ),
        }
    }
}

impl fmt::Display for ItineraryLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_detail())
    }
}

/// A charging stop inserted by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStop {
    /// Station used
    pub station: ChargingStation,
    /// Battery percentage on arrival, rounded to a whole percent
    pub arrival_battery: f64,
    /// Battery percentage on departure; always the configured target
    pub departure_battery: f64,
    /// Estimated time spent charging, including setup
    pub charge_time_minutes: u32,
}

/// The planner's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Total driving distance in miles
    pub total_distance_miles: f64,
    /// Driving plus charging time in minutes
    pub total_duration_minutes: f64,
    /// Time spent driving in minutes
    pub driving_duration_minutes: f64,
    /// Time spent charging in minutes
    pub charging_duration_minutes: f64,
    /// Charging stops actually used
    pub charging_stops: Vec<ChargingStop>,
    /// Candidate station pool considered along the route
    pub available_stations: Vec<ChargingStation>,
    /// Ordered driving and charging legs
    pub legs: Vec<ItineraryLeg>,
}

impl RoutePlan {
    /// Assemble a plan and derive its totals from the legs and stops
    #[must_use]
    pub fn new(
        legs: Vec<ItineraryLeg>,
        charging_stops: Vec<ChargingStop>,
        available_stations: Vec<ChargingStation>,
    ) -> Self {
        let (total_distance_miles, driving_duration_minutes) = legs
            .iter()
            .filter(|leg| leg.is_driving())
            .fold((0.0, 0.0), |(distance, duration), leg| {
                (distance + leg.distance_miles, duration + leg.duration_minutes)
            });
        let charging_duration_minutes: f64 = charging_stops
            .iter()
            .map(|stop| f64::from(stop.charge_time_minutes))
            .sum();

        Self {
            total_distance_miles,
            total_duration_minutes: driving_duration_minutes + charging_duration_minutes,
            driving_duration_minutes,
            charging_duration_minutes,
            charging_stops,
            available_stations,
            legs,
        }
    }

    /// Battery percentage at the destination
    #[must_use]
    pub fn final_battery(&self) -> Option<f64> {
        self.legs.last().map(|leg| leg.battery_remaining)
    }

    /// Driving legs that end below `threshold` percent
    #[must_use]
    pub fn legs_below(&self, threshold: f64) -> Vec<&ItineraryLeg> {
        self.legs
            .iter()
            .filter(|leg| leg.is_driving() && leg.battery_remaining < threshold)
            .collect()
    }

    /// Format as a compact one-line summary
    #[must_use]
    pub fn format_summary(&self) -> String {
        let hours = (self.total_duration_minutes / 60.0).floor();
        let minutes = self.total_duration_minutes - hours * 60.0;
        format!(
            "{:.0} mi, {hours:.0}h {minutes:.0}m total ({:.0} min charging, {} stop(s))",
            self.total_distance_miles,
            self.charging_duration_minutes,
            self.charging_stops.len()
        )
    }
}

impl fmt::Display for RoutePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ChargingNetwork;

    fn driving(miles: f64, minutes: f64, remaining: f64) -> ItineraryLeg {
        ItineraryLeg {
            kind: LegKind::Driving,
            from: Location::new("A", ""),
            to: Location::new("B", ""),
            distance_miles: miles,
            duration_minutes: minutes,
            battery_used: 10.0,
            battery_remaining: remaining,
        }
    }

    fn stop(minutes: u32) -> ChargingStop {
        ChargingStop {
            station: ChargingStation::new(
                "1",
                "Kettleman City",
                Location::new("Kettleman City", ""),
                ChargingNetwork::Tesla,
                250.0,
            ),
            arrival_battery: 22.0,
            departure_battery: 80.0,
            charge_time_minutes: minutes,
        }
    }

    fn charging(minutes: u32) -> ItineraryLeg {
        ItineraryLeg {
            kind: LegKind::Charging,
            from: Location::new("A", ""),
            to: Location::new("Kettleman City", ""),
            distance_miles: 0.0,
            duration_minutes: f64::from(minutes),
            battery_used: 0.0,
            battery_remaining: 80.0,
        }
    }

    #[test]
    fn test_totals() {
        let plan = RoutePlan::new(
            vec![driving(100.0, 90.0, 40.0), charging(25), driving(50.0, 45.0, 55.0)],
            vec![stop(25)],
            Vec::new(),
        );
        assert!((plan.total_distance_miles - 150.0).abs() < 1e-9);
        assert!((plan.driving_duration_minutes - 135.0).abs() < 1e-9);
        assert!((plan.charging_duration_minutes - 25.0).abs() < 1e-9);
        assert!((plan.total_duration_minutes - 160.0).abs() < 1e-9);
        assert_eq!(plan.final_battery(), Some(55.0));
    }

    #[test]
    fn test_empty_plan() {
        let plan = RoutePlan::new(Vec::new(), Vec::new(), Vec::new());
        assert!(plan.total_duration_minutes.abs() < f64::EPSILON);
        assert!(plan.final_battery().is_none());
    }

    #[test]
    fn test_legs_below() {
        let plan = RoutePlan::new(
            vec![driving(100.0, 90.0, 12.0), driving(50.0, 45.0, 30.0)],
            Vec::new(),
            Vec::new(),
        );
        let low = plan.legs_below(25.0);
        assert_eq!(low.len(), 1);
        assert!((low[0].battery_remaining - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_summary() {
        let plan = RoutePlan::new(
            vec![driving(100.0, 90.0, 40.0), charging(25)],
            vec![stop(25)],
            Vec::new(),
        );
        let summary = plan.format_summary();
        assert!(summary.contains("100 mi"));
        assert!(summary.contains("1h 55m"));
        assert!(summary.contains("25 min charging"));
        assert!(summary.contains("1 stop(s)"));
    }

    #[test]
    fn test_leg_format_detail() {
        assert!(driving(12.0, 15.0, 50.0).format_detail().contains("🚗"));
        let detail = charging(30).format_detail();
        assert!(detail.contains("⚡"));
        assert!(detail.contains("Kettleman City"));
        assert!(detail.contains("30 min"));
    }

    #[test]
    fn test_leg_kind_serialization() {
        assert_eq!(serde_json::to_string(&LegKind::Charging).unwrap(), "\"charging\"");
    }
}

//! Text rendering for plans and station lists

use std::fmt::Write;

use application::ServiceStatus;
use domain::{ChargingStation, RoutePlan};

/// Warning lines for driving legs that end under `threshold` percent
pub fn safety_warnings(plan: &RoutePlan, threshold: f64) -> Vec<String> {
    plan.legs_below(threshold)
        .into_iter()
        .map(|leg| {
            format!(
                "⚠️  {} → {} arrives with {:.0}% (below {threshold:.0}%)",
                leg.from, leg.to, leg.battery_remaining
            )
        })
        .collect()
}

/// Human-readable itinerary
pub fn render_plan(plan: &RoutePlan, threshold: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🗺️  {}", plan.format_summary());
    let _ = writeln!(out);

    for (i, leg) in plan.legs.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {leg}", i + 1);
    }

    if !plan.charging_stops.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "🔌 Charging stops:");
        for stop in &plan.charging_stops {
            let _ = writeln!(
                out,
                "   {} | {:.0}% → {:.0}% in {} min",
                stop.station, stop.arrival_battery, stop.departure_battery, stop.charge_time_minutes
            );
        }
    }

    if let Some(final_battery) = plan.final_battery() {
        let _ = writeln!(out);
        let _ = writeln!(out, "🔋 Arrival battery: {final_battery:.0}%");
    }

    let warnings = safety_warnings(plan, threshold);
    if !warnings.is_empty() {
        let _ = writeln!(out);
        for warning in warnings {
            let _ = writeln!(out, "{warning}");
        }
    }

    out.trim_end().to_string()
}

/// Station list, one per line
pub fn render_stations(stations: &[ChargingStation]) -> String {
    if stations.is_empty() {
        return "No charging stations found".to_string();
    }

    let mut out = format!("⚡ {} station(s):\n", stations.len());
    for station in stations {
        let _ = write!(out, "   [{}] {station}", station.id);
        if !station.available {
            out.push_str(" (offline)");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Provider reachability, one line per provider
pub fn render_status(status: &ServiceStatus) -> String {
    let line = |up: bool, name: &str, down: &str| {
        if up {
            format!("   ✅ {name}: reachable")
        } else {
            format!("   ❌ {name}: unreachable ({down})")
        }
    };

    [
        "📊 Provider status:".to_string(),
        line(status.routing, "routing", "planning unavailable"),
        line(status.stations, "stations", "plans will have no charging stops"),
    ]
    .join("\n")
}

//! Great-circle distance and nearest-station lookup

use crate::entities::ChargingStation;
use crate::value_objects::GeoLocation;

/// Haversine distance between two points in miles.
///
/// Symmetric, zero for coincident points, and takes the short way across the
/// antimeridian.
#[must_use]
pub fn distance(a: &GeoLocation, b: &GeoLocation) -> f64 {
    a.distance_miles(b)
}

/// Station closest to `point`.
///
/// Stations without coordinates are skipped. Ties go to the earlier station
/// in `stations`.
#[must_use]
pub fn closest<'a>(
    point: &GeoLocation,
    stations: impl IntoIterator<Item = &'a ChargingStation>,
) -> Option<&'a ChargingStation> {
    let mut best: Option<(&ChargingStation, f64)> = None;

    for station in stations {
        let Some(coords) = station.coordinates() else {
            continue;
        };
        let d = distance(point, &coords);
        match best {
            Some((_, best_distance)) if d >= best_distance => {},
            _ => best = Some((station, d)),
        }
    }

    best.map(|(station, _)| station)
}

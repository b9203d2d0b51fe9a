//! Great-circle distance
//!
//! Haversine distance between two coordinates on a spherical Earth.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::geo::Coordinate;
use std::f64::consts::PI;

/// Calculate the distance between two coordinates in kilometers
///
/// Uses the haversine formula with a 6371 km mean Earth radius. The result
/// is rounded to 2 decimal places for presentation and ranking. Symmetric
/// in its arguments and zero for identical points; longitude wraparound is
/// handled by the trigonometric formulation without an explicit branch.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude * PI / 180.0;
    let lat2 = b.latitude * PI / 180.0;
    let delta_lat = (b.latitude - a.latitude) * PI / 180.0;
    let delta_lng = (b.longitude - a.longitude) * PI / 180.0;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round2(EARTH_RADIUS_KM * c)
}

/// Round to 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Great-circle distance (Haversine)
//!
//! Absent positions produce `f64::INFINITY` rather than an error; callers
//! treat a non-finite distance as "cannot evaluate" and skip the entity.

use crate::types::GeoPoint;

/// Mean Earth radius (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Mean Earth radius (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Central angle between two points, in radians.
fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Haversine distance in kilometres.
pub fn distance_km(a: Option<&GeoPoint>, b: Option<&GeoPoint>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => EARTH_RADIUS_KM * central_angle(a, b),
        _ => f64::INFINITY,
    }
}

/// Haversine distance in metres.
pub fn distance_meters(a: Option<&GeoPoint>, b: Option<&GeoPoint>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => EARTH_RADIUS_M * central_angle(a, b),
        _ => f64::INFINITY,
    }
}

//! Numeric primitives: great-circle distance, segment interpolation and
//! point-in-polygon containment.

use geo::{Intersects, MultiPolygon};
use tracing::warn;

use crate::models::GeoPoint;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in degrees.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
}

/// [`distance_km`] on points
pub fn distance_between(a: GeoPoint, b: GeoPoint) -> f64 {
    distance_km(a.lat, a.lon, b.lat, b.lon)
}

/// Linear interpolation `a + fraction * (b - a)` on latitude and longitude.
///
/// `fraction` is clamped to `[0, 1]`; the result never leaves the segment.
/// A non-finite fraction is treated as 0.
pub fn interpolate_linear(a: GeoPoint, b: GeoPoint, fraction: f64) -> GeoPoint {
    let fraction = if !fraction.is_finite() {
        warn!("Non-finite interpolation fraction {}, using segment start", fraction);
        0.0
    } else if !(0.0..=1.0).contains(&fraction) {
        warn!("Interpolation fraction {} outside [0, 1], clamping", fraction);
        fraction.clamp(0.0, 1.0)
    } else {
        fraction
    };

    GeoPoint::new(
        a.lat + fraction * (b.lat - a.lat),
        a.lon + fraction * (b.lon - a.lon),
    )
}

/// Inclusive point-in-polygon test.
///
/// Points on an outer ring or hole edge count as contained; points strictly
/// inside a hole do not.
pub fn contains(polygon: &MultiPolygon<f64>, point: GeoPoint) -> bool {
    polygon.intersects(&point.to_geo())
}

/// Pick the candidate closest to `origin`, rejecting it if it lies farther
/// than `threshold_km`.
///
/// Ties go to the earliest candidate. Returns the winner and its distance.
pub fn nearest_within<T, I>(origin: GeoPoint, candidates: I, threshold_km: f64) -> Option<(T, f64)>
where
    I: IntoIterator<Item = (T, GeoPoint)>,
{
    let mut best: Option<(T, f64)> = None;

    for (item, point) in candidates {
        let distance = distance_between(origin, point);
        if !distance.is_finite() {
            continue;
        }
        match &best {
            Some((_, best_distance)) if distance >= *best_distance => {}
            _ => best = Some((item, distance)),
        }
    }

    best.filter(|(_, distance)| *distance <= threshold_km)
}

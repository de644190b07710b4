//! PIP service for locating the township for a point.

use tracing::debug;

use super::TownshipIndex;
use crate::geometry::nearest_within;
use crate::models::{GeoPoint, Township};

/// Point-in-Polygon lookup service
pub struct PipService {
    index: TownshipIndex,
}

impl PipService {
    /// Create a new PIP service from a spatial index
    pub fn new(index: TownshipIndex) -> Self {
        Self { index }
    }

    /// Township whose boundary contains the point, first in load order
    pub fn locate_by_containment(&self, lat: f64, lon: f64) -> Option<Township> {
        self.index
            .lookup(GeoPoint::new(lat, lon))
            .map(|b| b.township.clone())
    }

    /// Township with the nearest boundary centroid, if within `threshold_km`.
    ///
    /// Returns the township and its centroid distance in kilometers.
    pub fn locate_nearest(&self, lat: f64, lon: f64, threshold_km: f64) -> Option<(Township, f64)> {
        let origin = GeoPoint::new(lat, lon);
        let candidates = self
            .index
            .boundaries()
            .filter_map(|b| b.centroid.map(|c| (&b.township, c)));

        let found = nearest_within(origin, candidates, threshold_km);
        debug!(
            "Nearest centroid lookup at ({}, {}) within {} km: {:?}",
            lat, lon, threshold_km, found
        );
        found.map(|(township, distance)| (township.clone(), distance))
    }

    /// Get the spatial index (for stats/debugging)
    pub fn index(&self) -> &TownshipIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pip::TownshipBoundary;
    use geo::{polygon, MultiPolygon};

    fn service() -> PipService {
        let perry = polygon![
            (x: -86.60, y: 39.10),
            (x: -86.45, y: 39.10),
            (x: -86.45, y: 39.25),
            (x: -86.60, y: 39.25),
        ];
        let boundary = TownshipBoundary::new(
            Township::new("Monroe", "Perry Township"),
            MultiPolygon::new(vec![perry]),
            0,
        );
        PipService::new(TownshipIndex::build(vec![boundary]))
    }

    #[test]
    fn test_empty_service() {
        let service = PipService::new(TownshipIndex::build(vec![]));
        assert!(service.locate_by_containment(39.1653, -86.5264).is_none());
        assert!(service.locate_nearest(39.1653, -86.5264, 50.0).is_none());
    }

    #[test]
    fn test_containment() {
        let found = service().locate_by_containment(39.1653, -86.5264).unwrap();
        assert_eq!(found, Township::new("Monroe", "Perry Township"));
        assert!(service().locate_by_containment(40.7128, -74.0060).is_none());
    }

    #[test]
    fn test_nearest_centroid_threshold() {
        let service = service();
        // Just outside the square but near its centroid
        let (township, distance) = service.locate_nearest(39.30, -86.525, 50.0).unwrap();
        assert_eq!(township.name, "Perry Township");
        assert!(distance < 20.0);

        assert!(service.locate_nearest(40.7128, -74.0060, 50.0).is_none());
    }
}
